//! # Cycle timing
//!
//! Provides the time elapsed between two cycles of a task. Large gaps between cycles (a paused
//! task, the very first cycle) are not physically meaningful for integration, so any gap longer
//! than [`STALE_THRESHOLD_S`] is dropped and the cycle runs with a zero delta.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Instant;

use log::debug;
use util::time::Clock;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest gap between two cycles which is still integrated, in seconds.
pub const STALE_THRESHOLD_S: f64 = 2.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Measures the time between consecutive cycles.
#[derive(Debug, Clone)]
pub struct CycleTimer<C: Clock> {
    clock: C,

    /// Instant of the last cycle, or `None` before the first one.
    last_reference: Option<Instant>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C: Clock> CycleTimer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_reference: None,
        }
    }

    /// Set the reference to now, the next cycle measures its delta from here.
    pub fn reset(&mut self) {
        self.last_reference = Some(self.clock.now());
    }

    /// Get the sanitised time since the previous cycle in seconds, and move the reference to now.
    ///
    /// Returns 0 on the first cycle and whenever the gap exceeds [`STALE_THRESHOLD_S`].
    pub fn next_dt_s(&mut self) -> f64 {
        let now = self.clock.now();

        let dt_s = match self.last_reference.replace(now) {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => {
                debug!("First cycle, no time reference yet");
                return 0.0;
            }
        };

        if dt_s > STALE_THRESHOLD_S {
            debug!(
                "Cycle gap of {:.3} s exceeds {:.1} s, dropping it",
                dt_s, STALE_THRESHOLD_S
            );
            0.0
        }
        else {
            dt_s
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
