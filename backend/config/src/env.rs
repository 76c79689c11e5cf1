//! Environment-variable loading for `VisionConfig`.
//!
//! Variable names match the desktop tool's `.env` keys so an existing `.env`
//! exported into the shell works unchanged. Unparseable numbers keep the
//! default and log a warning.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::schema::VisionConfig;

pub const ENV_ENDPOINT: &str = "VISION_ENDPOINT";
pub const ENV_MODEL: &str = "VISION_MODEL";
pub const ENV_API_KEY: &str = "VISION_API_KEY";
pub const ENV_MAX_WORKERS: &str = "MAX_WORKERS";
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "RETRY_DELAY";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const ENV_RATE_LIMIT_RPM: &str = "RATE_LIMIT_RPM";
pub const ENV_RATE_JITTER_MS: &str = "RATE_JITTER_MS";
pub const ENV_OUTPUT_FILE: &str = "OUTPUT_FILE";
pub const ENV_CACHE: &str = "HORADRIC_CACHE";
pub const ENV_LOG_DIR: &str = "HORADRIC_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";

impl VisionConfig {
    /// Load configuration from the process environment with defaults.
    pub fn from_env() -> Self {
        Self::from_env_map(&std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map (useful for testing).
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = non_empty(env, ENV_ENDPOINT) {
            config.endpoint = v.to_string();
        }
        if let Some(v) = non_empty(env, ENV_MODEL) {
            config.model = v.to_string();
        }
        if let Some(v) = non_empty(env, ENV_API_KEY) {
            config.api_key = v.to_string();
        }
        parse_into(env, ENV_MAX_WORKERS, &mut config.max_workers);
        parse_into(env, ENV_MAX_RETRIES, &mut config.max_retries);
        parse_into(env, ENV_RETRY_DELAY, &mut config.retry_delay_secs);
        parse_into(env, ENV_REQUEST_TIMEOUT, &mut config.request_timeout_secs);
        parse_into(env, ENV_RATE_LIMIT_RPM, &mut config.rate_limit_rpm);
        parse_into(env, ENV_RATE_JITTER_MS, &mut config.rate_jitter_ms);
        if let Some(v) = non_empty(env, ENV_OUTPUT_FILE) {
            config.output_file = Some(PathBuf::from(v));
        }
        if let Some(v) = non_empty(env, ENV_CACHE) {
            config.cache_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(env, ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(v);
        }
        if let Some(v) = non_empty(env, ENV_LOG_LEVEL) {
            config.log_level = v.to_string();
        }

        config
    }
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_into<T: FromStr>(env: &HashMap<String, String>, key: &str, slot: &mut T) {
    let Some(raw) = non_empty(env, key) else { return };
    match raw.parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => warn!(var = key, value = raw, "Ignoring unparseable config value"),
    }
}
