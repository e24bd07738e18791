//! # Trajectory store
//!
//! Holds the sequence of waypoints the rover is following. A new sequence
//! always replaces the old one entirely.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use comms_if::nav::Waypoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct TrajectoryStore {
    waypoints: Vec<Waypoint>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored trajectory.
    pub fn replace(&mut self, waypoints: Vec<Waypoint>) {
        info!(
            "New trajectory with {} waypoints (previous had {})",
            waypoints.len(),
            self.waypoints.len()
        );
        self.waypoints = waypoints;
    }

    /// An owned copy of the trajectory.
    pub fn to_vec(&self) -> Vec<Waypoint> {
        self.waypoints.clone()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
