//! # Path tracker interface
//!
//! The algorithm which actually follows the trajectory (pure pursuit on a
//! lookahead point, with a PD controller to align the rover when its heading
//! error grows too large) lives outside this crate. Waypoint navigation only
//! needs to feed it a trajectory and a pose, and collect the command and the
//! state it reports.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{PdConfig, TrackerConfig};
use crate::loc::Pose;
use comms_if::nav::{MotionCommand, ReportedState, Waypoint};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A path tracking algorithm.
pub trait PathTracker {
    /// Build a tracker with no trajectory.
    fn new(config: &TrackerConfig) -> Self where Self: Sized;

    /// Replace the trajectory being followed.
    fn set_trajectory(&mut self, waypoints: Vec<Waypoint>);

    /// Set the current pose of the rover.
    fn set_pose(&mut self, pose: &Pose);

    /// Compute the motion command for the current pose.
    fn update(&mut self) -> MotionCommand;

    /// The state as of the last `update`.
    fn navigation_state(&self) -> ReportedState;

    /// The point on the trajectory currently being pursued.
    fn lookahead_point(&self) -> Option<Waypoint>;

    /// Index of the trajectory segment currently being followed.
    fn current_segment(&self) -> usize;

    fn set_translational_velocity(&mut self, velocity_ms: f64);

    fn set_pd_config(&mut self, pd: &PdConfig);

    /// Set the default tolerances used for waypoints which don't set their own.
    fn set_tolerances(&mut self, position_m: f64, heading_rad: f64);
}
