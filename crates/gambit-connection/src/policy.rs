//! Reconnection policy: how long to wait, and how many times to try.
//!
//! The policy is plain data so it can live in a config file. Delays are
//! stored as milliseconds because that serializes cleanly to JSON.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape of the delay curve between reconnection attempts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// Every attempt waits `base_interval_ms`.
    #[default]
    Fixed,
    /// Attempt `n` waits `base_interval_ms * 2^(n-1)`, capped at
    /// `max_interval_ms`.
    Exponential,
}

/// Configuration for reconnection behavior.
///
/// ```text
/// open ──(unsolicited close)──→ wait delay_for(1) ──→ dial ──✗──→ wait delay_for(2) ──→ …
///   ↑                                                  │
///   └──────────────────(success, counter := 0)─────────┘
/// ```
///
/// After `max_attempts` failed reconnects in a row the manager stops for
/// good and reports it. The initial dial doesn't count as a reconnect.
///
/// `#[serde(default)]` lets a config file specify only the fields it cares
/// about; everything else falls back to [`ReconnectPolicy::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnect, and every reconnect for
    /// [`Backoff::Fixed`]. Default: 5000 ms.
    pub base_interval_ms: u64,

    /// Ceiling for [`Backoff::Exponential`]. Default: 60 000 ms.
    pub max_interval_ms: u64,

    /// How many reconnects to try before giving up. 0 disables
    /// reconnection entirely. Default: 10.
    pub max_attempts: u32,

    /// Delay curve. Default: fixed.
    pub backoff: Backoff,

    /// Upper bound of a uniform random extra delay added to every wait,
    /// so a relay restart doesn't get every client back in the same
    /// millisecond. Default: 0 (no jitter).
    pub jitter_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_interval_ms: 5_000,
            max_interval_ms: 60_000,
            max_attempts: 10,
            backoff: Backoff::Fixed,
            jitter_ms: 0,
        }
    }
}

impl ReconnectPolicy {
    /// A fixed-interval policy.
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            base_interval_ms: duration_ms(interval),
            max_attempts,
            backoff: Backoff::Fixed,
            ..Self::default()
        }
    }

    /// An exponential policy starting at `base` and capped at `max`.
    pub fn exponential(base: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            base_interval_ms: duration_ms(base),
            max_interval_ms: duration_ms(max),
            max_attempts,
            backoff: Backoff::Exponential,
            jitter_ms: 0,
        }
    }

    /// A policy that never reconnects.
    pub fn never() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Adds up to `jitter` of random extra delay to every wait.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter_ms = duration_ms(jitter);
        self
    }

    /// The deterministic part of the delay before reconnect `attempt`
    /// (1-based). Attempt 0 is treated as attempt 1.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let ms = match self.backoff {
            Backoff::Fixed => self.base_interval_ms,
            Backoff::Exponential => {
                // Shifting past 32 would overflow long before the cap
                // matters, so the exponent is clamped first.
                let exponent = attempt.saturating_sub(1).min(32);
                self.base_interval_ms
                    .saturating_mul(1u64 << exponent)
                    .min(self.max_interval_ms.max(self.base_interval_ms))
            }
        };
        Duration::from_millis(ms)
    }

    /// The full delay before reconnect `attempt`, jitter included.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.jitter_ms == 0 {
            return base;
        }
        let extra = rand::rng().random_range(0..self.jitter_ms);
        base + Duration::from_millis(extra)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
