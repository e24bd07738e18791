//! # Command gate
//!
//! Sits between the path tracker and the motion command output. While the
//! rover is allowed to drive the tracker's command is passed through, while it
//! must stop a zero command is forced. Commands equal to the last one written
//! are suppressed so that consumers only see changes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace};

use super::GateDecision;
use comms_if::nav::MotionCommand;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct CommandGate {
    /// Write the command every cycle while driving, even if unchanged
    repeat_command: bool,

    /// The last command emitted
    last_emitted: Option<MotionCommand>,

    /// Set while the rover is held stopped
    stopped: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CommandGate {
    pub fn new(repeat_command: bool) -> Self {
        Self {
            repeat_command,
            ..Default::default()
        }
    }

    /// Get the command to emit this cycle, if any.
    pub fn process(
        &mut self,
        decision: GateDecision,
        cmd: &MotionCommand
    ) -> Option<MotionCommand> {
        let out = match decision {
            GateDecision::Stop => {
                if !self.stopped {
                    debug!("Stop latched");
                }
                self.stopped = true;

                let zero = MotionCommand::zero();
                if self.last_emitted == Some(zero) {
                    None
                }
                else {
                    Some(zero)
                }
            }
            GateDecision::Drive => {
                if self.stopped {
                    debug!("Stop released");
                }
                self.stopped = false;

                if self.repeat_command || self.last_emitted != Some(*cmd) {
                    Some(*cmd)
                }
                else {
                    None
                }
            }
        };

        match out {
            Some(c) => self.last_emitted = Some(c),
            None => trace!("Command unchanged, not emitted")
        }

        out
    }

    /// Forget the last emitted command and release the stop.
    pub fn reset(&mut self) {
        self.last_emitted = None;
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn last_emitted(&self) -> Option<&MotionCommand> {
        self.last_emitted.as_ref()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
