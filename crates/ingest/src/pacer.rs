//! Fixed-interval pacing between external calls.
//!
//! Batch workflows issue one search per query/genre and must leave a
//! gap between successive calls to stay under provider rate limits.
//! The clock is injectable so tests run without real delays.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Real time via the tokio runtime.
pub struct TokioClock;

#[async_trait::async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Waits out the remainder of a fixed interval since the previous call.
///
/// The first `pace()` returns immediately; each later one sleeps only
/// for whatever part of the interval has not already elapsed.
pub struct Pacer<C: Clock = TokioClock> {
    interval: Duration,
    clock: C,
    last: Mutex<Option<Instant>>,
}

impl Pacer<TokioClock> {
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, TokioClock)
    }
}

impl<C: Clock> Pacer<C> {
    pub fn with_clock(interval: Duration, clock: C) -> Self {
        Self {
            interval,
            clock,
            last: Mutex::new(None),
        }
    }

    pub async fn pace(&self) {
        let wait = match *self.last.lock().unwrap() {
            Some(prev) => self
                .interval
                .saturating_sub(self.clock.now().duration_since(prev)),
            None => Duration::ZERO,
        };
        if !wait.is_zero() {
            self.clock.sleep(wait).await;
        }
        *self.last.lock().unwrap() = Some(self.clock.now());
    }

    /// Extra cool-down after a failed call, on top of normal pacing.
    pub async fn back_off(&self, duration: Duration) {
        self.clock.sleep(duration).await;
        *self.last.lock().unwrap() = Some(self.clock.now());
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use super::*;

    /// Clock that advances instantly and records every sleep request.
    pub struct ManualClock {
        start: Instant,
        advanced: Mutex<Duration>,
        pub sleeps: Mutex<Vec<Duration>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
                advanced: Mutex::new(Duration::ZERO),
                sleeps: Mutex::new(Vec::new()),
            }
        }

        pub fn advance(&self, duration: Duration) {
            *self.advanced.lock().unwrap() += duration;
        }
    }

    #[async_trait::async_trait]
    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.advanced.lock().unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
            self.advance(duration);
        }
    }
}
