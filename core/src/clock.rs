//! Clock abstraction for testable time handling.

use chrono::{DateTime, Utc};

/// Abstracts time so TTL logic can be exercised deterministically.
///
/// Production code uses [`SystemClock`]; tests inject a mock clock and
/// advance it past the protocol timers instead of sleeping.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
