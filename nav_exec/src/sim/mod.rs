//! # Motion simulation module
//!
//! Simulates the rover's motion by integrating motion commands into its pose. The simulation
//! replaces the real rover and localisation when testing the navigation tasks.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd_cache;
pub mod following_test;
pub mod integrator;
pub mod params;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cmd_cache::MotionCommandCache;
pub use following_test::{FollowingTest, FollowingTestError};
pub use integrator::{integrate, select_branch, turn_centre, KinematicBranch};
pub use params::FollowingTestParams;
