//! Time source for engine and formatter operations.

use chrono::Utc;

/// Unix timestamp in whole seconds.
pub type Timestamp = i64;

/// A source of the current instant.
///
/// Every time-dependent operation takes a clock explicitly so tests can pin
/// "now" instead of racing the wall clock.
pub trait Clock {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Returns a clock advanced by `secs`.
    #[must_use]
    pub const fn advanced(self, secs: i64) -> Self {
        Self(self.0 + secs)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
