//! Process-wide request gate: bounds outbound calls per minute across all workers.
//!
//! Permits are handed out on a fixed grid spaced `60s / rpm` apart, so any
//! rolling 60-second window holds at most `rpm` grants. The reservation is
//! taken under a fair (FIFO) async mutex and the wait happens outside it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use horadric_config::VisionConfig;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limit policy shared by every worker of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPolicy {
    /// Max permits granted in any 60-second window.
    pub requests_per_minute: u32,
    /// Upper bound of the random delay added to each permit; 0 disables.
    pub jitter_ms: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            requests_per_minute: 30,
            jitter_ms: 200,
        }
    }
}

impl RateLimitPolicy {
    pub fn from_config(config: &VisionConfig) -> Self {
        Self {
            requests_per_minute: config.rate_limit_rpm,
            jitter_ms: config.rate_jitter_ms,
        }
    }

    /// Minimum spacing between two permits.
    pub fn interval(&self) -> Duration {
        WINDOW / self.requests_per_minute.max(1)
    }
}

pub struct RateLimiter {
    policy: RateLimitPolicy,
    /// Earliest instant the next permit may be granted.
    next_slot: Mutex<Option<Instant>>,
    granted: AtomicU64,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            next_slot: Mutex::new(None),
            granted: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Wait until this caller may send a request.
    ///
    /// Jitter is folded into the reserved slot, so it delays the grant without
    /// ever shrinking the gap to the next one.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let earliest = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            let slot = earliest + self.jitter();
            *next = Some(slot + self.policy.interval());
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate-limit slot");
            tokio::time::sleep_until(slot).await;
        }
        self.granted.fetch_add(1, Ordering::Relaxed);
    }

    /// Permits handed out so far.
    pub fn granted(&self) -> u64 {
        self.granted.load(Ordering::Relaxed)
    }

    fn jitter(&self) -> Duration {
        if self.policy.jitter_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=self.policy.jitter_ms))
    }
}
