//! Admission gate enforcing minimum spacing between provider calls
//!
//! Every provider request waits on one shared [`Pacer`] so the external
//! API's rate constraints are honored regardless of how many keyword
//! fetches run concurrently. Admission is FIFO; retry policy lives in the
//! client, not here.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::time::Duration;

/// Single shared clock gate for provider call pacing
pub struct Pacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Pacer {
    /// Create a pacer admitting one call per `min_interval`
    ///
    /// A zero interval falls back to one call per second.
    pub fn new(min_interval: Duration) -> Self {
        let quota = Quota::with_period(min_interval)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN));

        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Wait until a call slot is available
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer").finish_non_exhaustive()
    }
}
