//! Wall-clock seam for session expiry.
//!
//! Session expiry is driven by epoch-millisecond timestamps rather than
//! monotonic instants, matching what the backend stamps on a session. The
//! [`Clock`] trait keeps that dependency injectable so expiry logic is
//! testable with a logical clock instead of real waits.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}
