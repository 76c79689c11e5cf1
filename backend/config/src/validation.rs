//! Config validation with user-friendly error messages.

use thiserror::Error;

use crate::defaults::MAX_WORKERS_LIMIT;
use crate::schema::VisionConfig;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &VisionConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_endpoint(config, &mut report);
    validate_limits(config, &mut report);
    report
}

fn validate_endpoint(config: &VisionConfig, report: &mut ValidationReport) {
    let endpoint = config.endpoint.trim();
    if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        report.error("endpoint", "Endpoint must be an http(s) URL");
    } else if endpoint.starts_with("http://")
        && !endpoint.contains("localhost")
        && !endpoint.contains("127.0.0.1")
    {
        report.warn("endpoint", "Plain http endpoint; the API key will be sent unencrypted");
    }
    if config.model.trim().is_empty() {
        report.error("model", "Model id cannot be empty");
    }
    if config.api_key.trim().is_empty() {
        report.error("apiKey", "API key is missing (set VISION_API_KEY)");
    }
}

fn validate_limits(config: &VisionConfig, report: &mut ValidationReport) {
    if config.max_workers == 0 || config.max_workers > MAX_WORKERS_LIMIT {
        report.error(
            "maxWorkers",
            format!("Worker count must be between 1 and {MAX_WORKERS_LIMIT}"),
        );
    } else if config.max_workers > 10 {
        report.warn(
            "maxWorkers",
            "More than 10 workers rarely helps; the RPM ceiling is shared",
        );
    }
    if config.max_retries == 0 {
        report.error("maxRetries", "At least one attempt is required");
    }
    if config.request_timeout_secs == 0 {
        report.error("requestTimeoutSecs", "Request timeout must be > 0");
    }
    if config.rate_limit_rpm == 0 {
        report.error("rateLimitRpm", "Requests per minute must be > 0");
    } else if config.rate_limit_rpm > 600 {
        report.warn("rateLimitRpm", "RPM above 600 exceeds most provider quotas");
    }
    if config.auth_failure_limit == 0 {
        report.error("authFailureLimit", "Auth failure limit must be > 0");
    }
}
