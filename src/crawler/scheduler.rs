//! Request pacing
//!
//! Every network-facing step after the first waits a random delay drawn from
//! the configured range, keeping the request rate against the catalog low and
//! irregular.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Draws and sleeps pacing delays
#[derive(Debug, Clone)]
pub struct Pacer {
    range: RangeInclusive<Duration>,
}

impl Pacer {
    pub fn new(range: RangeInclusive<Duration>) -> Self {
        Self { range }
    }

    /// Picks the next delay uniformly from the range
    pub fn next_delay(&self) -> Duration {
        let (min, max) = (*self.range.start(), *self.range.end());
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    /// Sleeps for the next delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Pacing for {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}
