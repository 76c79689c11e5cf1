//! `horadric config`: show the effective configuration.

use anyhow::Result;

use horadric_config::{validate, VisionConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

pub fn run(config: &VisionConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    for error in &report.errors {
        note_error(&error.to_string());
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
    Ok(())
}
