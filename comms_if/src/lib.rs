//! # Communications interface crate.
//!
//! Provides the typed samples exchanged between the navigation tasks and whatever host is
//! scheduling them, along with the port abstraction used to move those samples around.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Navigation sample types (motion commands, waypoints, navigation states)
pub mod nav;

/// Typed input and output ports
pub mod port;
