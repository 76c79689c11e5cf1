//! Configuration value object consumed by the pipeline.
//!
//! Loading and saving settings is the caller's business; this crate only
//! describes the shape and fills in defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionConfig {
    /// Chat-completions URL of the vision provider
    pub endpoint: String,
    /// Model id sent with every request
    pub model: String,
    /// Bearer token
    pub api_key: String,
    /// Worker pool width
    pub max_workers: usize,
    /// Attempts per image, including the first
    pub max_retries: u32,
    /// Base backoff; attempt N waits `retry_delay * N`
    pub retry_delay_secs: u64,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Requests-per-minute ceiling shared by all workers
    pub rate_limit_rpm: u32,
    /// Upper bound of the random delay added after each permit (0 disables)
    pub rate_jitter_ms: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub auth_failure_limit: usize,
    /// Aggregate output file; defaults to `<folder>/output.txt`
    pub output_file: Option<PathBuf>,
    /// Catalog cache file
    pub cache_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            max_workers: DEFAULT_MAX_WORKERS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            rate_limit_rpm: DEFAULT_RATE_LIMIT_RPM,
            rate_jitter_ms: DEFAULT_RATE_JITTER_MS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            auth_failure_limit: DEFAULT_AUTH_FAILURE_LIMIT,
            output_file: None,
            cache_path: default_cache_path(),
            log_dir: default_log_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl VisionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.rate_jitter_ms)
    }

    /// Worker count clamped into `1..=MAX_WORKERS_LIMIT`.
    pub fn effective_workers(&self) -> usize {
        self.max_workers.clamp(1, MAX_WORKERS_LIMIT)
    }

    /// JSON snapshot with secrets masked, safe for logs and `horadric config`.
    pub fn redacted(&self) -> serde_json::Value {
        let value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        crate::redact::redact(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_desktop_tool() {
        let config = VisionConfig::default();
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.rate_limit_rpm, 30);
        assert_eq!(config.rate_jitter_ms, 200);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.retry_delay(), Duration::from_secs(10));
    }

    #[test]
    fn workers_are_clamped() {
        let config = VisionConfig { max_workers: 0, ..Default::default() };
        assert_eq!(config.effective_workers(), 1);
        let config = VisionConfig { max_workers: 500, ..Default::default() };
        assert_eq!(config.effective_workers(), MAX_WORKERS_LIMIT);
    }

    #[test]
    fn redacted_hides_api_key() {
        let config = VisionConfig {
            api_key: "gsk_live_0123456789abcdef".into(),
            ..Default::default()
        };
        let snapshot = config.redacted();
        let key = snapshot["apiKey"].as_str().unwrap();
        assert!(key.ends_with("***"));
        assert!(!key.contains("0123456789"));
        assert_eq!(snapshot["model"], DEFAULT_MODEL);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: VisionConfig =
            serde_json::from_str(r#"{"model":"gpt-4o","maxWorkers":4}"#).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.rate_limit_rpm, DEFAULT_RATE_LIMIT_RPM);
    }
}
