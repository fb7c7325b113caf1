//! Wall-clock source for timer operations

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime};

pub trait Clock: Send + Sync {
    /// Current instant with the local UTC offset in effect at that moment.
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    /// Starts at `start` read as UTC.
    pub fn new(start: NaiveDateTime) -> Self {
        Self::at(start.and_utc().fixed_offset())
    }

    pub fn at(instant: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
