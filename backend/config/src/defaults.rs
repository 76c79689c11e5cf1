//! Default values, matching what the desktop tool shipped with.

use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

pub const DEFAULT_MAX_WORKERS: usize = 1;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RATE_LIMIT_RPM: u32 = 30;
pub const DEFAULT_RATE_JITTER_MS: u64 = 200;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Consecutive 401/403 responses, with no success yet, that stop the batch.
pub const DEFAULT_AUTH_FAILURE_LIMIT: usize = 3;

/// Upper bound on the worker pool width.
pub const MAX_WORKERS_LIMIT: usize = 32;

pub const DEFAULT_LOG_LEVEL: &str = "info";

const APP_DIR: &str = "horadric";

/// `<cache dir>/horadric/catalog.json`, falling back to the working directory.
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".horadric"))
        .join("catalog.json")
}

/// `<local data dir>/horadric/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".horadric"))
        .join("logs")
}
