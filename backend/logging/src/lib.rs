//! Structured logging for the tooltip pipeline.
//!
//! Handles console + rolling NDJSON file output, secret redaction, and the
//! per-image batch event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{BatchEventLogger, BATCH_EVENTS_TARGET};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
