//! # Navigation module
//!
//! Waypoint navigation drives the rover along a trajectory by running a
//! [`PathTracker`] every cycle. The tracker's command only reaches the rover if
//! the navigation state allows it: the [`NavStateMachine`] turns the tracker's
//! state into a drive/stop decision and the [`CommandGate`] applies it.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod gate;
pub mod params;
pub mod state;
pub mod task;
pub mod tracker;
pub mod traj_store;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use gate::CommandGate;
pub use params::{NavParams, NavParamsError, PdConfig, TrackerConfig};
pub use state::{GateDecision, NavStateMachine};
pub use task::{WaypointNavigation, WaypointNavigationError};
pub use tracker::PathTracker;
pub use traj_store::TrajectoryStore;
