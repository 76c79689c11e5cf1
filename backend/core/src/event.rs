use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FailureKind;
use crate::types::Category;

/// Progress notification for the caller driving a batch (CLI, GUI shell).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub run_id: Uuid,
    pub index: usize,
    pub total: usize,
    pub timestamp: DateTime<Utc>,
    pub status: ProgressStatus,
    pub message: String,
}

/// Lifecycle of one image within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ProgressStatus {
    /// The worker picked the task up
    Started,
    /// A failed attempt is about to be retried
    Retrying { attempt: u32, delay_ms: u64 },
    /// Text extracted and classified
    Succeeded { category: Category, chars: usize },
    /// Skipped after a terminal failure
    Failed { kind: FailureKind },
    /// Response cleaned down to nothing
    Dropped,
    /// Stop was requested before the task could run
    Cancelled,
}

impl ProgressStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started | Self::Retrying { .. })
    }
}

impl ProgressEvent {
    pub fn new(
        run_id: Uuid,
        index: usize,
        total: usize,
        status: ProgressStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            index,
            total,
            timestamp: Utc::now(),
            status,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Retrying { attempt, delay_ms } => {
                write!(f, "retrying (attempt {attempt}, in {delay_ms}ms)")
            }
            Self::Succeeded { category, chars } => write!(f, "ok ({chars} chars, {category})"),
            Self::Failed { kind } => write!(f, "failed ({kind})"),
            Self::Dropped => write!(f, "dropped"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!ProgressStatus::Started.is_terminal());
        assert!(!ProgressStatus::Retrying { attempt: 1, delay_ms: 10 }.is_terminal());
        assert!(ProgressStatus::Dropped.is_terminal());
        assert!(ProgressStatus::Failed { kind: FailureKind::Auth }.is_terminal());
    }

    #[test]
    fn event_serializes_tagged_status() {
        let event = ProgressEvent::new(
            Uuid::new_v4(),
            2,
            5,
            ProgressStatus::Succeeded { category: Category::Rune, chars: 42 },
            "ber.png",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"]["status"], "succeeded");
        assert_eq!(json["status"]["category"], "RUNE");
        assert_eq!(json["index"], 2);
    }
}
