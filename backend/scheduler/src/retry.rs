//! Retry engine: linear backoff for failed vision requests, as a small state machine.

use std::time::Duration;

use horadric_config::VisionConfig;
use horadric_core::RequestError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Retry policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Attempts per image, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; failure N waits `base_delay * N`.
    pub base_delay: Duration,
    /// Maximum delay cap, also applied to provider `Retry-After` values.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &VisionConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: config.retry_delay(),
            ..Default::default()
        }
    }

    /// Delay before the attempt following failed attempt `attempt_number` (1-indexed).
    pub fn delay_for(&self, attempt_number: u32) -> Duration {
        if attempt_number == 0 {
            return Duration::ZERO;
        }
        self.base_delay
            .saturating_mul(attempt_number)
            .min(self.max_delay)
    }

    pub fn should_retry(&self, attempt_number: u32) -> bool {
        attempt_number < self.max_attempts
    }
}

/// Where a request is in its retry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt `attempt` (1-indexed) is about to be sent.
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed; wait `delay` before the next one.
    Backoff { attempt: u32, delay: Duration },
    Succeeded { attempts: u32 },
    /// No more attempts: budget spent or the error is not retryable.
    Exhausted { attempts: u32 },
}

impl Default for RetryState {
    fn default() -> Self {
        Self::Attempting { attempt: 1 }
    }
}

impl RetryState {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn on_success(self) -> Self {
        match self {
            Self::Attempting { attempt } => Self::Succeeded { attempts: attempt },
            other => other,
        }
    }

    /// Record a failed attempt and decide between backing off and giving up.
    pub fn on_failure(self, policy: &RetryPolicy, error: &RequestError) -> Self {
        let Self::Attempting { attempt } = self else {
            return self;
        };

        if !error.is_retryable() {
            debug!(attempt, error = %error, "Error is not retryable");
            return Self::Exhausted { attempts: attempt };
        }
        if !policy.should_retry(attempt) {
            warn!(attempt, max = policy.max_attempts, "Retry budget exhausted");
            return Self::Exhausted { attempts: attempt };
        }

        let delay = error
            .retry_after()
            .map(|d| d.min(policy.max_delay))
            .unwrap_or_else(|| policy.delay_for(attempt));
        Self::Backoff { attempt, delay }
    }

    /// Leave backoff for the next attempt.
    pub fn resume(self) -> Self {
        match self {
            Self::Backoff { attempt, .. } => Self::Attempting { attempt: attempt + 1 },
            other => other,
        }
    }

    /// Attempts made or in flight so far.
    pub fn attempts(&self) -> u32 {
        match *self {
            Self::Attempting { attempt } | Self::Backoff { attempt, .. } => attempt,
            Self::Succeeded { attempts } | Self::Exhausted { attempts } => attempts,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Exhausted { .. })
    }
}
