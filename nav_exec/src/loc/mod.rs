//! # Localisation module
//!
//! This module provides the rover's pose. The pose itself is estimated elsewhere (or simulated by
//! [`crate::sim`]), this module only defines how it is represented.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use util::maths::map_pi_to_2pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and attitude in the LM frame) of the rover.
///
/// More specifically this represents the Rover Body (RB) frame in the Local
/// Map (LM) frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {

    /// The position in the LM frame
    pub position_m_lm: Vector3<f64>,

    /// The attitude of the rover in the LM frame.
    ///
    /// Rotations are always composed onto this from the left (LM frame deltas).
    pub attitude_q_lm: UnitQuaternion<f64>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {

    /// Build a planar pose from a start position on the XY plane and a heading in degrees.
    pub fn from_start(position_m: Vector2<f64>, heading_deg: f64) -> Self {
        Self {
            position_m_lm: Vector3::new(position_m[0], position_m[1], 0.0),
            attitude_q_lm: UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                heading_deg.to_radians()
            )
        }
    }

    /// Return the heading (angle to the positive LM_X axis) of the rover in radians.
    ///
    /// Heading is given in the range [-pi, pi], with 0 being in the LM_X direction.
    pub fn get_heading(&self) -> f64 {
        self.attitude_q_lm.euler_angles().2
    }

    /// Heading in the range [0, 2*pi].
    pub fn get_heading_2pi(&self) -> f64 {
        map_pi_to_2pi(self.get_heading())
    }

    /// Unit vector along the rover's heading in the LM frame.
    pub fn heading_vector(&self) -> Vector3<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.get_heading()) * Vector3::x()
    }

    /// Position on the XY plane
    pub fn position2(&self) -> Vector2<f64> {
        self.position_m_lm.xy()
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}), yaw = {:.2} deg",
            self.position_m_lm[0],
            self.position_m_lm[1],
            self.position_m_lm[2],
            self.get_heading_2pi().to_degrees()
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_from_start() {
        let pose = Pose::from_start(Vector2::new(2.0, -1.0), 90.0);

        assert_eq!(pose.position_m_lm, Vector3::new(2.0, -1.0, 0.0));
        assert!((pose.get_heading() - PI / 2.0).abs() < 1e-12);

        let dir = pose.heading_vector();
        assert!(dir[0].abs() < 1e-12);
        assert!((dir[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heading_ranges() {
        let pose = Pose::from_start(Vector2::zeros(), -90.0);

        assert!((pose.get_heading() + PI / 2.0).abs() < 1e-12);
        assert!((pose.get_heading_2pi() - 1.5 * PI).abs() < 1e-12);
        assert_eq!(
            format!("{}", pose),
            "(0.000, 0.000, 0.000), yaw = 270.00 deg"
        );
    }
}
