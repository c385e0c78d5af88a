//! Time source and progress estimation for the simulated extraction pipeline.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of "now" so status derivation can be driven deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to; used by the CLI demo and tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = *guard + by;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Estimates how far along a document is. Values are clamped to `0..=100`.
pub trait ProgressEstimator: Send + Sync {
    fn progress(&self, uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> u8;
}

/// Linear progress: a fixed number of percentage points per elapsed minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTimeEstimator {
    percent_per_minute: u32,
}

impl ElapsedTimeEstimator {
    pub const fn new(percent_per_minute: u32) -> Self {
        Self { percent_per_minute }
    }
}

impl Default for ElapsedTimeEstimator {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ProgressEstimator for ElapsedTimeEstimator {
    fn progress(&self, uploaded_at: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
        let elapsed_ms = (now - uploaded_at).num_milliseconds().max(0) as u128;
        // floor(elapsed_minutes * rate) without going through floating point
        let percent = elapsed_ms * u128::from(self.percent_per_minute) / 60_000;
        percent.min(100) as u8
    }
}
