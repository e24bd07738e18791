//! # Motion command cache
//!
//! Holds the latest motion command received by the simulation, so that a command keeps being
//! executed on cycles where nothing new arrives.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, warn};

use comms_if::{
    nav::MotionCommand,
    port::{InputPort, PortRead}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The most recently received motion command. Starts out as the stop command.
#[derive(Debug, Default, Copy, Clone)]
pub struct MotionCommandCache {
    current: MotionCommand
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionCommandCache {
    /// Update the cache from the port if it holds a new command.
    ///
    /// Non-finite commands are rejected and the previous command kept.
    pub fn refresh(&mut self, port: &mut InputPort<MotionCommand>) -> &MotionCommand {
        if let PortRead::NewData(cmd) = port.read_newest() {
            if cmd.is_finite() {
                debug!("New motion command: {:?}", cmd);
                self.current = cmd;
            }
            else {
                warn!("Rejecting non-finite motion command {:?}", cmd);
            }
        }

        &self.current
    }

    pub fn current(&self) -> &MotionCommand {
        &self.current
    }

    /// Go back to the stop command.
    pub fn reset(&mut self) {
        self.current = MotionCommand::zero();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
