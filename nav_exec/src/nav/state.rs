//! # Navigation state machine
//!
//! Maps the state reported by the path tracker onto the state published by
//! the task, and decides whether the rover may drive this cycle. Only
//! `Driving` and `Aligning` allow motion, every other state (including a code
//! the task doesn't recognise) stops the rover.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};

use comms_if::nav::{NavigationState, ReportedState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct NavStateMachine {
    /// The last known state, `None` until one has been reported
    published: Option<NavigationState>,

    /// True if the last interpretation changed the published state
    changed: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Whether the motion command may be passed on this cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Drive,
    Stop
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret the reported state.
    pub fn interpret(&mut self, reported: ReportedState) -> GateDecision {
        let (state, decision) = match reported {
            ReportedState::Known(s @ NavigationState::Driving)
            | ReportedState::Known(s @ NavigationState::Aligning) => (s, GateDecision::Drive),
            ReportedState::Known(s @ NavigationState::TargetReached)
            | ReportedState::Known(s @ NavigationState::OutOfBoundaries)
            | ReportedState::Known(s @ NavigationState::NoTrajectory)
            | ReportedState::Known(s @ NavigationState::NoPose) => (s, GateDecision::Stop),
            ReportedState::Unrecognised(code) => {
                warn!("Unrecognised navigation state {}, stopping the rover", code);
                self.changed = false;
                return GateDecision::Stop;
            }
        };

        self.changed = self.published != Some(state);
        if self.changed {
            info!("Navigation state: {:?} -> {:?}", self.published, state);
            self.published = Some(state);
        }

        decision
    }

    /// The currently published state.
    pub fn published(&self) -> Option<NavigationState> {
        self.published
    }

    /// Whether the last call to `interpret` changed the published state.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
