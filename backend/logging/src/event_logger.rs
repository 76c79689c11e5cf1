//! Batch Event Logger
//!
//! Per-image progress events written through `tracing` so they land in the
//! rolling NDJSON file next to ordinary log lines.

use horadric_core::{ProgressEvent, ProgressStatus};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

/// `tracing` target used for batch progress records.
pub const BATCH_EVENTS_TARGET: &str = "batch_events";

#[derive(Debug, Serialize)]
pub struct BatchEventEntry<'a> {
    pub run_id: String,
    pub index: usize,
    pub total: usize,
    pub status: &'a ProgressStatus,
    pub message: String,
}

pub struct BatchEventLogger;

impl BatchEventLogger {
    /// Record one progress event, redacting anything secret in its message.
    pub fn log_event(event: &ProgressEvent) {
        let entry = Self::entry(event);
        let json = serde_json::to_string(&entry).unwrap_or_default();

        match event.status {
            ProgressStatus::Failed { .. } | ProgressStatus::Dropped => {
                warn!(target: BATCH_EVENTS_TARGET, index = entry.index, total = entry.total, event = %json, "Batch event");
            }
            _ => {
                info!(target: BATCH_EVENTS_TARGET, index = entry.index, total = entry.total, event = %json, "Batch event");
            }
        }
    }

    pub fn entry(event: &ProgressEvent) -> BatchEventEntry<'_> {
        BatchEventEntry {
            run_id: event.run_id.to_string(),
            index: event.index,
            total: event.total,
            status: &event.status,
            message: redact_sensitive_data(&event.message),
        }
    }
}
