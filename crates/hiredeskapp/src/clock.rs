//! Time source used by every component that stamps or expires data.
//!
//! Production code uses [`SystemClock`]. Tests use [`FixedClock`] to move time
//! forward without sleeping, which is how snapshot retention and TTL expiry
//! are exercised.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

/// Starts at the current time, truncated to whole milliseconds like every
/// stored timestamp.
impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Utc::now().trunc_subsecs(3))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
