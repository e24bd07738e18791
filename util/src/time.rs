//! General time utility functions

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A source of monotonic time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The host's monotonic clock.
#[derive(Debug, Default, Copy, Clone)]
pub struct MonotonicClock;

/// A clock which only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while a task owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now()))
        }
    }

    /// Move the clock forward by the given number of seconds.
    pub fn advance_s(&self, seconds: f64) {
        self.now.set(self.now.get() + Duration::from_secs_f64(seconds));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let t0 = clock.now();

        handle.advance_s(1.5);
        assert_eq!(clock.now() - t0, Duration::from_millis(1500));
    }

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(duration_to_seconds(chrono::Duration::milliseconds(2500)), Some(2.5));
        assert_eq!(duration_to_seconds(chrono::Duration::max_value()), None);
    }
}
