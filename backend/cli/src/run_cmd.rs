//! `horadric run`: one batch over a screenshot folder.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use horadric_config::{validate, VisionConfig};
use horadric_core::{ProgressEvent, ProgressStatus};
use horadric_scheduler::{ensure_txt_path, scan_folder, BatchSummary, Dispatcher};
use horadric_vision::provider_from_config;

use crate::terminal_output::{
    note_error, note_info, note_success, note_warn, paint, CYAN, DIM, GREEN, RED, YELLOW,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Folder holding the screenshots (.png, .jpg, .jpeg)
    pub folder: PathBuf,
    /// Aggregate output file [default: <folder>/output.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Requests-per-minute ceiling
    #[arg(long)]
    pub rpm: Option<u32>,
    /// Attempts per image, including the first
    #[arg(long)]
    pub retries: Option<u32>,
    /// Max random delay added to each request, in ms (0 disables)
    #[arg(long)]
    pub jitter_ms: Option<u64>,
    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Model id override
    #[arg(long)]
    pub model: Option<String>,
}

impl RunArgs {
    /// Flags override whatever the environment supplied.
    pub fn apply(&self, config: &mut VisionConfig) {
        if let Some(output) = &self.output {
            config.output_file = Some(output.clone());
        }
        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if let Some(rpm) = self.rpm {
            config.rate_limit_rpm = rpm;
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(jitter) = self.jitter_ms {
            config.rate_jitter_ms = jitter;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
    }
}

pub async fn run(args: RunArgs, mut config: VisionConfig) -> Result<()> {
    args.apply(&mut config);

    let report = validate(&config);
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    if !report.is_valid() {
        for error in &report.errors {
            note_error(&error.to_string());
        }
        bail!("invalid configuration ({} error(s))", report.errors.len());
    }

    let tasks = scan_folder(&args.folder)?;
    if tasks.is_empty() {
        note_warn(&format!("No screenshots found in {}", args.folder.display()));
        return Ok(());
    }

    let output = ensure_txt_path(config.output_file.as_deref(), &args.folder)
        .with_context(|| format!("Cannot prepare output path in {}", args.folder.display()))?;
    info!(config = %config.redacted(), "Effective configuration");
    note_info(&format!(
        "{} image(s), {} worker(s), {} rpm -> {}",
        tasks.len(),
        config.effective_workers(),
        config.rate_limit_rpm,
        output.display()
    ));

    let provider = provider_from_config(&config)?;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let dispatcher = Dispatcher::from_config(&config, provider).with_progress(tx);

    let cancel = dispatcher.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            note_warn("Stop requested; letting in-flight requests finish");
            cancel.cancel();
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_progress(&event);
        }
    });

    let result = dispatcher.run_to_file(tasks, &output).await;
    drop(dispatcher);
    let _ = printer.await;

    let summary = result?;
    print_summary(&summary);
    Ok(())
}

fn print_progress(event: &ProgressEvent) {
    let color = match event.status {
        ProgressStatus::Started => DIM,
        ProgressStatus::Retrying { .. } | ProgressStatus::Cancelled => YELLOW,
        ProgressStatus::Succeeded { .. } => GREEN,
        ProgressStatus::Failed { .. } | ProgressStatus::Dropped => RED,
    };
    let position = format!("[{}/{}]", event.index + 1, event.total);
    println!(
        "{} {} {}",
        paint(&position, CYAN),
        paint(&event.status.to_string(), color),
        event.message
    );
}

fn print_summary(summary: &BatchSummary) {
    let mut line = format!("{} processed, {} skipped", summary.processed, summary.skipped);
    for (kind, count) in &summary.failed_by_kind {
        line.push_str(&format!(", {count} {kind}"));
    }
    if summary.dropped_empty > 0 {
        line.push_str(&format!(", {} empty", summary.dropped_empty));
    }
    line.push_str(&format!(" in {:.1}s", summary.elapsed.as_secs_f64()));

    if summary.cancelled {
        note_warn(&format!("Stopped early: {line}; {} not run", summary.not_run));
    } else {
        note_success(&line);
    }
    if let Some(path) = &summary.output_path {
        note_info(&format!("Wrote {}", path.display()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = RunArgs {
            folder: PathBuf::from("shots"),
            output: Some(PathBuf::from("out/items")),
            workers: Some(4),
            rpm: Some(12),
            retries: None,
            jitter_ms: Some(0),
            timeout: None,
            model: None,
        };
        let mut config = VisionConfig::default();
        args.apply(&mut config);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.rate_limit_rpm, 12);
        assert_eq!(config.rate_jitter_ms, 0);
        assert_eq!(config.max_retries, VisionConfig::default().max_retries);
        assert_eq!(config.output_file, Some(PathBuf::from("out/items")));
    }
}
