//! # Navigation samples
//!
//! Samples passed between the waypoint navigation tasks, the path tracker and the host.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A velocity command for the rover body.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// The translational velocity of the rover body in meters/second.
    ///
    /// Positive speeds are "forwards" along the rover's heading, negative speeds are "backwards".
    pub translation_ms: f64,

    /// The rotational velocity of the rover body in radians/second.
    ///
    /// Follows the right hand rule about the rover's Z+ (upwards) axis, so that a positive rate
    /// turns the rover to the left (counter-clockwise seen from above).
    pub rotation_rads: f64,
}

/// A single point of a trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position of the waypoint in the LM frame
    pub position_m: Vector3<f64>,

    /// Desired heading of the rover at this waypoint, if any
    #[serde(default)]
    pub heading_rad: Option<f64>,

    /// Distance within which the waypoint is considered reached
    #[serde(default)]
    pub tol_position_m: Option<f64>,

    /// Heading error within which the waypoint heading is considered reached
    #[serde(default)]
    pub tol_heading_rad: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The navigation state of the rover as computed by the path tracker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationState {
    /// Following the trajectory
    Driving,

    /// Turning on the spot to line up with the trajectory
    Aligning,

    /// The final waypoint has been reached
    TargetReached,

    /// The rover has left the safety corridor around the trajectory
    OutOfBoundaries,

    /// There is no trajectory to follow
    NoTrajectory,

    /// The rover's pose is not known
    NoPose,
}

/// A navigation state as reported by the path tracker.
///
/// Trackers report states as raw codes, which may not map onto any known [`NavigationState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportedState {
    Known(NavigationState),
    Unrecognised(i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotionCommand {
    pub fn new(translation_ms: f64, rotation_rads: f64) -> Self {
        Self {
            translation_ms,
            rotation_rads,
        }
    }

    /// The stop command.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Both components of the command are finite.
    pub fn is_finite(&self) -> bool {
        self.translation_ms.is_finite() && self.rotation_rads.is_finite()
    }
}

impl Waypoint {
    /// Create a waypoint on the XY plane with no heading or tolerance requirements.
    pub fn new(x_m: f64, y_m: f64) -> Self {
        Self {
            position_m: Vector3::new(x_m, y_m, 0.0),
            heading_rad: None,
            tol_position_m: None,
            tol_heading_rad: None,
        }
    }
}

impl NavigationState {
    /// The integer code used to publish this state.
    pub fn code(&self) -> i32 {
        match self {
            NavigationState::Driving => 0,
            NavigationState::Aligning => 1,
            NavigationState::TargetReached => 2,
            NavigationState::OutOfBoundaries => 3,
            NavigationState::NoTrajectory => 4,
            NavigationState::NoPose => 5,
        }
    }

    /// Get the state matching a published code, if there is one.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(NavigationState::Driving),
            1 => Some(NavigationState::Aligning),
            2 => Some(NavigationState::TargetReached),
            3 => Some(NavigationState::OutOfBoundaries),
            4 => Some(NavigationState::NoTrajectory),
            5 => Some(NavigationState::NoPose),
            _ => None,
        }
    }
}

impl From<i32> for ReportedState {
    fn from(code: i32) -> Self {
        match NavigationState::from_code(code) {
            Some(s) => ReportedState::Known(s),
            None => ReportedState::Unrecognised(code),
        }
    }
}

impl From<NavigationState> for ReportedState {
    fn from(state: NavigationState) -> Self {
        ReportedState::Known(state)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
