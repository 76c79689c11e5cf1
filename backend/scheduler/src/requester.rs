//! One image in, raw tooltip text out: per-request timeout, retries and backoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use horadric_core::{
    ImageFailure, ImageTask, RequestError, RequestOutcome, RequestTemplate, VisionProvider,
    VisionRequest,
};
use horadric_vision::encode_image_file;

use crate::rate_limiter::RateLimiter;
use crate::retry::{RetryPolicy, RetryState};

pub struct RetryingRequester {
    provider: Arc<dyn VisionProvider>,
    template: RequestTemplate,
    policy: RetryPolicy,
    timeout: Duration,
    /// Gates attempts after the first; the caller gates the first one.
    limiter: Option<Arc<RateLimiter>>,
}

impl RetryingRequester {
    pub fn new(
        provider: Arc<dyn VisionProvider>,
        template: RequestTemplate,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            template,
            policy,
            timeout,
            limiter: None,
        }
    }

    /// Count retries against a shared rate limiter.
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Read and encode the screenshot into a ready-to-send request.
    pub async fn prepare(&self, task: &ImageTask) -> Result<VisionRequest, ImageFailure> {
        let data_uri = encode_image_file(task.path())
            .await
            .map_err(|e| ImageFailure::io(format!("cannot read {}: {e}", task.path().display())))?;
        Ok(self.template.with_image(data_uri))
    }

    /// Prepare and send in one step.
    pub async fn fetch(&self, task: &ImageTask) -> RequestOutcome {
        let start = Instant::now();
        match self.prepare(task).await {
            Ok(request) => self.send(task.index, &request, |_, _| {}).await,
            Err(failure) => RequestOutcome {
                index: task.index,
                result: Err(failure),
                attempts: 0,
                elapsed: start.elapsed(),
            },
        }
    }

    /// Drive the retry state machine for one request.
    ///
    /// `on_retry(next_attempt, delay)` fires before every backoff sleep.
    pub async fn send<F>(&self, index: usize, request: &VisionRequest, mut on_retry: F) -> RequestOutcome
    where
        F: FnMut(u32, Duration) + Send,
    {
        let start = Instant::now();
        let mut state = RetryState::start();
        let mut text = None;
        let mut last_error = None;

        loop {
            match state {
                RetryState::Attempting { attempt } => {
                    if attempt > 1 {
                        if let Some(limiter) = &self.limiter {
                            limiter.acquire().await;
                        }
                    }
                    match self.attempt(request).await {
                        Ok(content) => {
                            text = Some(content);
                            state = state.on_success();
                        }
                        Err(err) => {
                            warn!(index, attempt, error = %err, "Vision request failed");
                            state = state.on_failure(&self.policy, &err);
                            last_error = Some(err);
                        }
                    }
                }
                RetryState::Backoff { attempt, delay } => {
                    debug!(index, attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                    on_retry(attempt + 1, delay);
                    tokio::time::sleep(delay).await;
                    state = state.resume();
                }
                RetryState::Succeeded { attempts } => {
                    return RequestOutcome {
                        index,
                        result: text.ok_or_else(|| ImageFailure {
                            kind: horadric_core::FailureKind::Malformed,
                            attempts,
                            reason: "no content recorded".into(),
                        }),
                        attempts,
                        elapsed: start.elapsed(),
                    };
                }
                RetryState::Exhausted { attempts } => {
                    let failure = match &last_error {
                        Some(err) => ImageFailure::from_request(err, attempts),
                        None => ImageFailure {
                            kind: horadric_core::FailureKind::Transient,
                            attempts,
                            reason: "retries exhausted".into(),
                        },
                    };
                    return RequestOutcome {
                        index,
                        result: Err(failure),
                        attempts,
                        elapsed: start.elapsed(),
                    };
                }
            }
        }
    }

    async fn attempt(&self, request: &VisionRequest) -> Result<String, RequestError> {
        let response = tokio::time::timeout(self.timeout, self.provider.extract_text(request))
            .await
            .map_err(|_| RequestError::Timeout(self.timeout))??;

        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                latency_ms = response.latency_ms,
                "Token usage"
            );
        }
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use horadric_core::{FailureKind, VisionResponse};
    use horadric_vision::MockVisionProvider;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn template() -> RequestTemplate {
        RequestTemplate {
            model: "mock-model".into(),
            system_prompt: "sys".into(),
            user_prompt: "user".into(),
            max_tokens: 64,
            temperature: 0.0,
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(60),
        }
    }

    fn image(dir: &tempfile::TempDir) -> ImageTask {
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"\x89PNG fake").unwrap();
        ImageTask::new(0, path)
    }

    #[tokio::test(start_paused = true)]
    async fn two_transient_failures_then_success_takes_three_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVisionProvider::new("mock").with_script([
            Err(RequestError::from_status(500, "boom", None)),
            Err(RequestError::Timeout(Duration::from_secs(1))),
            Ok("Ber Rune".to_string()),
        ]));
        let requester = RetryingRequester::new(mock.clone(), template(), policy(), Duration::from_secs(30));

        let outcome = requester.fetch(&image(&dir)).await;
        assert_eq!(outcome.result, Ok("Ber Rune".to_string()));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(mock.calls(), 3);
        // 10s after the first failure, 20s after the second.
        assert!(outcome.elapsed >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn forbidden_is_attempted_once() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockVisionProvider::new("mock")
                .with_script((0..5).map(|_| Err(RequestError::from_status(403, "forbidden", None)))),
        );
        let requester = RetryingRequester::new(mock.clone(), template(), policy(), Duration::from_secs(30));

        let outcome = requester.fetch(&image(&dir)).await;
        let failure = outcome.result.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Auth);
        assert_eq!(failure.attempts, 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_keeps_last_reason() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVisionProvider::new("mock").with_script([
            Err(RequestError::from_status(502, "bad gateway", None)),
            Err(RequestError::from_status(503, "unavailable", None)),
            Err(RequestError::Malformed("empty message content".into())),
        ]));
        let requester = RetryingRequester::new(mock.clone(), template(), policy(), Duration::from_secs(30));

        let outcome = requester.fetch(&image(&dir)).await;
        let failure = outcome.result.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Malformed);
        assert_eq!(failure.attempts, 3);
        assert!(failure.reason.contains("empty message content"));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_callback_sees_retry_after() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVisionProvider::new("mock").with_script([
            Err(RequestError::from_status(429, "slow down", Some(Duration::from_secs(7)))),
            Ok("Shako".to_string()),
        ]));
        let requester = RetryingRequester::new(mock, template(), policy(), Duration::from_secs(30));
        let task = image(&dir);
        let request = requester.prepare(&task).await.unwrap();

        let mut retries = Vec::new();
        let outcome = requester
            .send(task.index, &request, |attempt, delay| retries.push((attempt, delay)))
            .await;
        assert!(outcome.is_success());
        assert_eq!(retries, vec![(2, Duration::from_secs(7))]);
    }

    #[tokio::test]
    async fn unreadable_image_is_io_failure_without_attempts() {
        let mock = Arc::new(MockVisionProvider::new("mock").with_response("unused"));
        let requester = RetryingRequester::new(mock.clone(), template(), policy(), Duration::from_secs(30));

        let outcome = requester.fetch(&ImageTask::new(4, "/definitely/missing.png")).await;
        assert_eq!(outcome.index, 4);
        assert_eq!(outcome.attempts, 0);
        assert_eq!(outcome.result.unwrap_err().kind, FailureKind::Io);
        assert_eq!(mock.calls(), 0);
    }

    struct SlowProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl VisionProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn extract_text(&self, request: &VisionRequest) -> Result<VisionResponse, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(VisionResponse {
                content: "late".into(),
                model: request.model.clone(),
                usage: None,
                latency_ms: 0,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn per_request_timeout_is_transient() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(SlowProvider { calls: AtomicU32::new(0) });
        let requester = RetryingRequester::new(
            provider.clone(),
            template(),
            RetryPolicy { max_attempts: 2, ..policy() },
            Duration::from_secs(5),
        );

        let outcome = requester.fetch(&image(&dir)).await;
        let failure = outcome.result.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Transient);
        assert!(failure.reason.contains("timed out"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_wait_for_shared_limiter() {
        use crate::rate_limiter::RateLimitPolicy;

        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVisionProvider::new("mock").with_script([
            Err(RequestError::from_status(500, "boom", None)),
            Ok("Ist Rune".to_string()),
        ]));
        let limiter = Arc::new(RateLimiter::new(RateLimitPolicy {
            requests_per_minute: 1,
            jitter_ms: 0,
        }));
        limiter.acquire().await;

        let requester = RetryingRequester::new(
            mock,
            template(),
            RetryPolicy { base_delay: Duration::from_secs(1), ..policy() },
            Duration::from_secs(30),
        )
        .with_limiter(limiter.clone());

        let outcome = requester.fetch(&image(&dir)).await;
        assert!(outcome.is_success());
        assert_eq!(limiter.granted(), 2);
        assert!(outcome.elapsed >= Duration::from_secs(60));
    }
}
