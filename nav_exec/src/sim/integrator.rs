//! # Pose integrator
//!
//! Propagates the rover's pose under a constant motion command for one time step. The command is
//! interpreted kinematically as one of three manouvres:
//!
//! - Point turn: no translation, the rover rotates about its own centre.
//! - Straight line: no rotation, the rover moves along its heading.
//! - Ackermann arc: the rover moves on a circle about a turn centre lying on its left/right axis,
//!   at a distance of `translation / rotation`.
//!
//! All rotations are about the LM_Z axis and are composed onto the attitude from the left.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{UnitQuaternion, Vector3};

use crate::loc::Pose;
use comms_if::nav::MotionCommand;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Velocities with a magnitude below this are treated as zero when selecting the manouvre.
pub const EPSILON: f64 = 1e-6;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The kinematic branch used to integrate a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KinematicBranch {
    PointTurn,
    StraightLine,
    Arc,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Select the branch used to integrate the given command.
///
/// A command with neither translation nor rotation is a point turn at zero rate.
pub fn select_branch(cmd: &MotionCommand) -> KinematicBranch {
    if cmd.translation_ms.abs() < EPSILON {
        KinematicBranch::PointTurn
    }
    else if cmd.rotation_rads.abs() < EPSILON {
        KinematicBranch::StraightLine
    }
    else {
        KinematicBranch::Arc
    }
}

/// Get the centre of the turn described by the command, in the LM frame.
///
/// Only arcs have a turn centre.
pub fn turn_centre(pose: &Pose, cmd: &MotionCommand) -> Option<Vector3<f64>> {
    match select_branch(cmd) {
        KinematicBranch::Arc => Some(arc_centre(pose, cmd)),
        _ => None
    }
}

/// Integrate the command over `dt_s` seconds starting from `pose`.
///
/// A zero `dt_s` returns the pose unchanged.
pub fn integrate(pose: &Pose, cmd: &MotionCommand, dt_s: f64) -> Pose {
    if dt_s == 0.0 {
        return *pose;
    }

    let mut next = *pose;

    match select_branch(cmd) {
        KinematicBranch::PointTurn => {
            let delta = yaw_rotation(cmd.rotation_rads * dt_s);
            next.attitude_q_lm = compose(&delta, &pose.attitude_q_lm);
        }
        KinematicBranch::StraightLine => {
            next.position_m_lm += (cmd.translation_ms * dt_s) * pose.heading_vector();
        }
        KinematicBranch::Arc => {
            let centre = arc_centre(pose, cmd);
            let delta = yaw_rotation(cmd.rotation_rads * dt_s);

            next.position_m_lm = delta * (pose.position_m_lm - centre) + centre;
            next.attitude_q_lm = compose(&delta, &pose.attitude_q_lm);
        }
    }

    next
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Rotation of `angle_rad` about the LM_Z axis.
fn yaw_rotation(angle_rad: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle_rad)
}

/// Turn centre of an arc command, on the rover's left/right axis at `translation / rotation`.
fn arc_centre(pose: &Pose, cmd: &MotionCommand) -> Vector3<f64> {
    let centre_rb = Vector3::new(0.0, cmd.translation_ms / cmd.rotation_rads, 0.0);
    yaw_rotation(pose.get_heading()) * centre_rb + pose.position_m_lm
}

/// Apply `delta` (in the LM frame) to `attitude`, renormalising the result.
fn compose(delta: &UnitQuaternion<f64>, attitude: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::new_normalize((delta * attitude).into_inner())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
