//! Clock port — injectable time source.
//!
//! Cooldown gating is pure arithmetic over timestamps, so injecting the
//! clock makes every timing property deterministic under test.

use growctl_domain::time::{self, Timestamp};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}
