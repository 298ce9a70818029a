//! Minimum-interval gate shared by every outbound request

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::fmt;
use std::time::Duration;

type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces dispatches so consecutive requests are at least `min_interval`
/// apart, across all callers.
///
/// Backed by a single-cell quota (burst of one, replenished once per
/// interval). A zero interval disables pacing.
pub struct RateGate {
    min_interval: Duration,
    limiter: Option<GovernorRateLimiter>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        let limiter = Quota::with_period(min_interval).map(RateLimiter::direct);
        Self {
            min_interval,
            limiter,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request may be dispatched
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for RateGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateGate")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}
