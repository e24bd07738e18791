//! Waypoint navigation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for waypoint navigation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NavParams {

    /// Parameters used to build the path tracker
    pub tracker: TrackerConfig,

    /// Gains of the alignment controller
    pub pd: PdConfig,

    /// Distance to a waypoint under which it is considered reached, unless the
    /// waypoint sets its own tolerance.
    pub position_tolerance_m: f64,

    /// Heading error under which a waypoint is considered reached, unless the
    /// waypoint sets its own tolerance.
    pub heading_tolerance_rad: f64,

    /// If true the motion command is written every cycle while driving,
    /// otherwise only when it changes.
    #[serde(default)]
    pub repeat_command: bool
}

/// Configuration of the path tracker
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Smallest radius of an Ackermann arc the rover can drive
    pub min_turn_radius_m: f64,

    /// Nominal forward speed
    pub translational_velocity_ms: f64,

    /// Nominal point turn rate
    pub rotational_velocity_rads: f64,

    /// Half width of the corridor around the path. Leaving it puts the rover
    /// out of boundaries.
    pub corridor_m: f64,

    /// Heading error above which the rover stops to align with the path
    pub max_disalignment_rad: f64,

    /// Distance along the path to the lookahead point
    pub lookahead_distance_m: f64,

    /// Drive the path in reverse
    #[serde(default)]
    pub backwards: bool
}

/// Gains of the proportional derivative alignment controller
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PdConfig {
    pub p: f64,
    pub d: f64,

    /// Limit on the absolute controller output
    pub saturation: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum NavParamsError {
    #[error("Parameter {0} must be finite, got {1}")]
    NotFinite(&'static str, f64),

    #[error("Parameter {0} must be strictly positive, got {1}")]
    NotPositive(&'static str, f64),

    #[error("Parameter {0} must not be negative, got {1}")]
    Negative(&'static str, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl NavParams {
    /// Check that all parameters are usable.
    pub fn validate(&self) -> Result<(), NavParamsError> {
        let t = &self.tracker;

        positive("tracker.translational_velocity_ms", t.translational_velocity_ms)?;
        positive("tracker.rotational_velocity_rads", t.rotational_velocity_rads)?;
        positive("tracker.corridor_m", t.corridor_m)?;
        positive("tracker.max_disalignment_rad", t.max_disalignment_rad)?;
        positive("tracker.lookahead_distance_m", t.lookahead_distance_m)?;
        non_negative("tracker.min_turn_radius_m", t.min_turn_radius_m)?;

        non_negative("pd.p", self.pd.p)?;
        non_negative("pd.d", self.pd.d)?;
        positive("pd.saturation", self.pd.saturation)?;

        positive("position_tolerance_m", self.position_tolerance_m)?;
        positive("heading_tolerance_rad", self.heading_tolerance_rad)?;

        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), NavParamsError> {
    if value.is_finite() {
        Ok(())
    }
    else {
        Err(NavParamsError::NotFinite(name, value))
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), NavParamsError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    }
    else {
        Err(NavParamsError::NotPositive(name, value))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), NavParamsError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    }
    else {
        Err(NavParamsError::Negative(name, value))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
