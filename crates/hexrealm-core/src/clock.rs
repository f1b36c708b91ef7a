//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

use crate::timestamp::Timestamp;

/// Abstraction over system time for deterministic behavior.
///
/// Event metadata (`occurred_at`) and the timestamps carried by commands
/// issued from inside the engine are both read from the injected clock.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as a domain timestamp.
    fn timestamp(&self) -> Timestamp {
        Timestamp::from(self.now())
    }
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
