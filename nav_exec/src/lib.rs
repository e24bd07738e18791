//! # Navigation library.
//!
//! This library allows other crates in the workspace to access items defined inside the navigation
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Cycle timing - sanitised time deltas between cycles
pub mod clock;

/// Localisation module - the rover's pose
pub mod loc;

/// Waypoint navigation - gates the path tracker's motion commands on the navigation state
pub mod nav;

/// Motion simulation - integrates motion commands into the rover's pose
pub mod sim;
