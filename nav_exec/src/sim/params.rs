//! Motion simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the following test simulation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FollowingTestParams {

    /// Starting position of the rover on the LM XY plane
    pub start_position_m: [f64; 2],

    /// Starting heading of the rover, anticlockwise from LM_X.
    ///
    /// Units: degrees
    pub start_heading_deg: f64
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
