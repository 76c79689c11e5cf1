use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed call to the vision endpoint.
///
/// One `RequestError` describes one attempt; the retry layer decides whether
/// another attempt follows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited (429): {message}")]
    RateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("unexpected status ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RequestError {
    /// Map an HTTP status and body onto the error taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            429 => Self::RateLimited { retry_after, message },
            500..=599 => Self::Server { status, message },
            _ => Self::Status { status, message },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthorized { .. } => FailureKind::Auth,
            Self::Malformed(_) => FailureKind::Malformed,
            Self::Transport(_)
            | Self::Timeout(_)
            | Self::RateLimited { .. }
            | Self::Server { .. }
            | Self::Status { .. } => FailureKind::Transient,
        }
    }

    /// Credentials will not fix themselves mid-run, everything else might.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unauthorized { .. })
    }

    /// Provider-requested wait, if the response carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Failure classes reported in the batch summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, timeout, 429, 5xx or other non-auth status; retried.
    Transient,
    /// 401/403; never retried.
    Auth,
    /// Empty or unparseable body; retried.
    Malformed,
    /// Source image unreadable.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Transient => "transient",
            Self::Auth => "auth",
            Self::Malformed => "malformed",
            Self::Io => "io",
        };
        f.write_str(s)
    }
}

/// Terminal failure for one image. The image is skipped; the batch continues.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind} failure after {attempts} attempt(s): {reason}")]
pub struct ImageFailure {
    pub kind: FailureKind,
    pub attempts: u32,
    pub reason: String,
}

impl ImageFailure {
    pub fn from_request(error: &RequestError, attempts: u32) -> Self {
        Self {
            kind: error.kind(),
            attempts,
            reason: error.to_string(),
        }
    }

    pub fn io(reason: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Io,
            attempts: 0,
            reason: reason.into(),
        }
    }
}

/// Errors that end a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot read input folder {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("batch halted after {failures} authorization failures without a single success: {last_error}")]
    Unauthorized { failures: usize, last_error: String },

    #[error("worker task failed: {0}")]
    Worker(String),
}

/// A category name that is not part of the closed set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);
