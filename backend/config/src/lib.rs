//! `horadric-config`: runtime configuration for the tooltip pipeline.
//!
//! Provides:
//! - Typed `VisionConfig` value object with defaults matching the desktop tool
//! - Environment variable loading with per-field fallbacks
//! - Validation report (errors + warnings)
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use redact::redact;
pub use schema::VisionConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};
