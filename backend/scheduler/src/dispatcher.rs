//! Batch dispatcher: bounded worker pool over the image list.
//!
//! Each worker pulls the next task from a shared queue, waits for a rate-limit
//! permit, fetches with retries, cleans and classifies, then writes into the
//! result slot reserved for the task's index. Output order is index order,
//! never completion order.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use horadric_config::VisionConfig;
use horadric_core::{
    BatchError, CleanedItem, FailureKind, ImageFailure, ImageTask, ProgressEvent, ProgressStatus,
    VisionProvider,
};
use horadric_logging::BatchEventLogger;
use horadric_understanding::{understand_response, Categorizer, ResponseCleaner};
use horadric_vision::request_template;

use crate::output::{write_atomic, AggregateDocument};
use crate::rate_limiter::{RateLimitPolicy, RateLimiter};
use crate::requester::RetryingRequester;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Worker pool width.
    pub workers: usize,
    /// Consecutive auth failures, with no success yet, that halt the run.
    pub auth_failure_limit: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            auth_failure_limit: 3,
        }
    }
}

impl DispatchOptions {
    pub fn from_config(config: &VisionConfig) -> Self {
        Self {
            workers: config.effective_workers(),
            auth_failure_limit: config.auth_failure_limit.max(1),
        }
    }
}

/// Counts reported at the end of every run, partial or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed_by_kind: BTreeMap<FailureKind, usize>,
    /// Responses that cleaned down to nothing.
    pub dropped_empty: usize,
    /// Tasks never started because the run was stopped.
    pub not_run: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
    pub output_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.failed_by_kind.values().sum()
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    pub document: AggregateDocument,
    pub summary: BatchSummary,
}

/// What ended up in one result slot.
#[derive(Debug)]
enum Slot {
    Item(CleanedItem),
    Failed(ImageFailure),
    Dropped,
}

/// Tracks consecutive auth failures before any success.
#[derive(Default)]
struct AuthGate {
    consecutive: AtomicUsize,
    any_success: AtomicBool,
    halted: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl AuthGate {
    fn record_success(&self) {
        self.any_success.store(true, Ordering::SeqCst);
        self.consecutive.store(0, Ordering::SeqCst);
    }

    fn record_other_failure(&self) {
        self.consecutive.store(0, Ordering::SeqCst);
    }

    /// Returns true when this failure trips the halt.
    fn record_auth_failure(&self, reason: &str, limit: usize) -> bool {
        *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
        let count = self.consecutive.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.any_success.load(Ordering::SeqCst) && count >= limit {
            return !self.halted.swap(true, Ordering::SeqCst);
        }
        false
    }

    fn last_error(&self) -> String {
        self.last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_default()
    }
}

/// Per-run state shared by all workers.
struct Run {
    id: Uuid,
    total: usize,
    /// Pending tasks with the result slot reserved for each.
    queue: Mutex<VecDeque<(usize, ImageTask)>>,
    slots: Vec<OnceLock<Slot>>,
    /// Child of the caller's token; also tripped by an auth halt.
    stop: CancellationToken,
    auth: AuthGate,
    auth_failure_limit: usize,
}

impl Run {
    fn next_task(&self) -> Option<(usize, ImageTask)> {
        if self.stop.is_cancelled() {
            return None;
        }
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front()
    }

    fn fill(&self, index: usize, slot: Slot) {
        if let Some(cell) = self.slots.get(index) {
            if cell.set(slot).is_err() {
                warn!(index, "Result slot already filled");
            }
        }
    }
}

#[derive(Clone)]
struct Worker {
    requester: Arc<RetryingRequester>,
    limiter: Arc<RateLimiter>,
    cleaner: Arc<ResponseCleaner>,
    categorizer: Arc<Categorizer>,
    progress: Option<UnboundedSender<ProgressEvent>>,
    run: Arc<Run>,
}

impl Worker {
    fn emit(&self, index: usize, status: ProgressStatus, message: impl Into<String>) {
        let event = ProgressEvent::new(self.run.id, index, self.run.total, status, message);
        BatchEventLogger::log_event(&event);
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }

    async fn work(self) {
        while let Some((slot, task)) = self.run.next_task() {
            self.process(slot, task).await;
        }
    }

    async fn process(&self, slot: usize, task: ImageTask) {
        let index = task.index;
        let name = task.file_name();

        let request = match self.requester.prepare(&task).await {
            Ok(request) => request,
            Err(failure) => {
                self.emit(index, ProgressStatus::Started, name.clone());
                self.fail(slot, index, &name, failure);
                return;
            }
        };

        tokio::select! {
            biased;
            _ = self.run.stop.cancelled() => {
                self.emit(index, ProgressStatus::Cancelled, format!("{name}: stopped before sending"));
                return;
            }
            _ = self.limiter.acquire() => {}
        }

        self.emit(index, ProgressStatus::Started, name.clone());
        let outcome = self
            .requester
            .send(index, &request, |attempt, delay| {
                self.emit(
                    index,
                    ProgressStatus::Retrying {
                        attempt,
                        delay_ms: delay.as_millis() as u64,
                    },
                    format!("{name}: retrying in {:.1}s", delay.as_secs_f64()),
                );
            })
            .await;

        match outcome.result {
            Ok(raw) => {
                self.run.auth.record_success();
                match understand_response(&self.cleaner, &self.categorizer, &raw) {
                    Some(item) => {
                        let category = item.category();
                        let chars = item.text().chars().count();
                        self.run.fill(slot, Slot::Item(item));
                        self.emit(
                            index,
                            ProgressStatus::Succeeded { category, chars },
                            format!("{name}: {chars} chars in {} attempt(s)", outcome.attempts),
                        );
                    }
                    None => {
                        self.run.fill(slot, Slot::Dropped);
                        self.emit(
                            index,
                            ProgressStatus::Dropped,
                            format!("{name}: response was empty after cleaning"),
                        );
                    }
                }
            }
            Err(failure) => self.fail(slot, index, &name, failure),
        }
    }

    fn fail(&self, slot: usize, index: usize, name: &str, failure: ImageFailure) {
        let kind = failure.kind;
        if kind == FailureKind::Auth {
            if self
                .run
                .auth
                .record_auth_failure(&failure.reason, self.run.auth_failure_limit)
            {
                error!(
                    failures = self.run.auth_failure_limit,
                    "Every request so far was rejected as unauthorized; halting batch"
                );
                self.run.stop.cancel();
            }
        } else if kind != FailureKind::Io {
            // An unreadable image never reached the endpoint.
            self.run.auth.record_other_failure();
        }
        self.emit(index, ProgressStatus::Failed { kind }, format!("{name}: {failure}"));
        self.run.fill(slot, Slot::Failed(failure));
    }
}

pub struct Dispatcher {
    requester: Arc<RetryingRequester>,
    limiter: Arc<RateLimiter>,
    cleaner: Arc<ResponseCleaner>,
    categorizer: Arc<Categorizer>,
    options: DispatchOptions,
    cancel: CancellationToken,
    progress: Option<UnboundedSender<ProgressEvent>>,
}

impl Dispatcher {
    pub fn new(requester: RetryingRequester, limiter: Arc<RateLimiter>, options: DispatchOptions) -> Self {
        Self {
            requester: Arc::new(requester),
            limiter,
            cleaner: Arc::new(ResponseCleaner::new()),
            categorizer: Arc::new(Categorizer::new()),
            options,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Wire limiter, requester and options from configuration.
    pub fn from_config(config: &VisionConfig, provider: Arc<dyn VisionProvider>) -> Self {
        let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::from_config(config)));
        let requester = RetryingRequester::new(
            provider,
            request_template(config),
            RetryPolicy::from_config(config),
            config.request_timeout(),
        )
        .with_limiter(limiter.clone());
        Self::new(requester, limiter, DispatchOptions::from_config(config))
    }

    pub fn with_cleaner(mut self, cleaner: ResponseCleaner) -> Self {
        self.cleaner = Arc::new(cleaner);
        self
    }

    pub fn with_categorizer(mut self, categorizer: Categorizer) -> Self {
        self.categorizer = Arc::new(categorizer);
        self
    }

    /// Receive a copy of every progress event.
    pub fn with_progress(mut self, tx: UnboundedSender<ProgressEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Share a stop signal owned by the caller.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the run between tasks when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process every task and assemble the document in index order.
    pub async fn run(&self, tasks: Vec<ImageTask>) -> Result<BatchOutput, BatchError> {
        let start = Instant::now();
        let total = tasks.len();
        let run = Arc::new(Run {
            id: Uuid::new_v4(),
            total,
            queue: Mutex::new(tasks.into_iter().enumerate().collect()),
            slots: (0..total).map(|_| OnceLock::new()).collect(),
            stop: self.cancel.child_token(),
            auth: AuthGate::default(),
            auth_failure_limit: self.options.auth_failure_limit.max(1),
        });

        let width = self.options.workers.clamp(1, total.max(1));
        info!(run_id = %run.id, total, workers = width, "Starting batch");

        let worker = Worker {
            requester: self.requester.clone(),
            limiter: self.limiter.clone(),
            cleaner: self.cleaner.clone(),
            categorizer: self.categorizer.clone(),
            progress: self.progress.clone(),
            run: run.clone(),
        };

        let mut pool = JoinSet::new();
        for _ in 0..width {
            pool.spawn(worker.clone().work());
        }
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                pool.abort_all();
                return Err(BatchError::Worker(e.to_string()));
            }
        }

        if run.auth.halted.load(Ordering::SeqCst) {
            return Err(BatchError::Unauthorized {
                failures: run.auth_failure_limit,
                last_error: run.auth.last_error(),
            });
        }

        // Whatever is still queued was never picked up.
        let leftover: Vec<(usize, ImageTask)> = run
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for (_, task) in &leftover {
            worker.emit(task.index, ProgressStatus::Cancelled, format!("{}: not started", task.file_name()));
        }

        let mut summary = BatchSummary {
            run_id: run.id,
            total,
            cancelled: self.cancel.is_cancelled(),
            ..Default::default()
        };
        let mut document = AggregateDocument::new();

        drop(worker);
        let run = Arc::try_unwrap(run).map_err(|_| BatchError::Worker("run state still shared".into()))?;
        for slot in run.slots.into_iter().map(OnceLock::into_inner) {
            match slot {
                Some(Slot::Item(item)) => {
                    summary.processed += 1;
                    document.push(item);
                }
                Some(Slot::Failed(failure)) => {
                    summary.skipped += 1;
                    *summary.failed_by_kind.entry(failure.kind).or_default() += 1;
                }
                Some(Slot::Dropped) => {
                    summary.skipped += 1;
                    summary.dropped_empty += 1;
                }
                None => summary.not_run += 1,
            }
        }
        summary.elapsed = start.elapsed();

        // Too few requests to trip the gate, yet none of them was authorized.
        let auth_failures = summary.failed_by_kind.get(&FailureKind::Auth).copied().unwrap_or(0);
        let only_auth = summary
            .failed_by_kind
            .keys()
            .all(|kind| matches!(kind, FailureKind::Auth | FailureKind::Io));
        if auth_failures > 0 && only_auth && !run.auth.any_success.load(Ordering::SeqCst) {
            error!(failures = auth_failures, "Every request was rejected as unauthorized");
            return Err(BatchError::Unauthorized {
                failures: auth_failures,
                last_error: run.auth.last_error(),
            });
        }

        info!(
            run_id = %summary.run_id,
            processed = summary.processed,
            skipped = summary.skipped,
            not_run = summary.not_run,
            cancelled = summary.cancelled,
            "Batch finished"
        );
        Ok(BatchOutput { document, summary })
    }

    /// Run and write the aggregate once, atomically, at the end.
    ///
    /// An empty task list writes nothing.
    pub async fn run_to_file(&self, tasks: Vec<ImageTask>, output: &Path) -> Result<BatchSummary, BatchError> {
        if tasks.is_empty() {
            info!("No images to process");
            return Ok(BatchSummary::default());
        }

        let BatchOutput { document, mut summary } = self.run(tasks).await?;
        write_atomic(output, &document.render())
            .await
            .map_err(|source| BatchError::OutputWrite {
                path: output.to_path_buf(),
                source,
            })?;
        summary.output_path = Some(output.to_path_buf());
        Ok(summary)
    }
}
