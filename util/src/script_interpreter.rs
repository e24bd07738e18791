//! # Script interpreter module
//!
//! This module provides an interpreter for timestamped command scripts. Each
//! command in a script is written as
//!
//! ```text
//! <exec_time_s>: <json payload>;
//! ```
//!
//! and is released by the interpreter once the session clock passes its
//! execution time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::Path;
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<T> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    cmd: T
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending` to
/// acquire a list of commands that need executing.
pub struct ScriptInterpreter<T> {
    cmds: VecDeque<Command<T>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, serde_json::Error),

    #[error("Script commands are out of order, {1} s comes after {0} s")]
    OutOfOrder(f64, f64)
}

#[derive(Debug, PartialEq)]
pub enum Pending<T> {
    None,
    Some(Vec<T>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: DeserializeOwned> ScriptInterpreter<T> {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(path)
            .map_err(ScriptError::ScriptLoadError)?;

        Self::from_str(&script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        let mut cmd_queue: VecDeque<Command<T>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("The script regex is invalid");

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = cap[1]
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = cmd_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s));
                }
            }

            // The scripts contain JSON only.
            let cmd = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidCmd(exec_time_s, e))?;

            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            cmds: cmd_queue
        })
    }
}

impl<T> ScriptInterpreter<T> {

    /// Return the pending commands according to the session clock.
    pub fn get_pending(&mut self) -> Pending<T> {
        self.get_pending_at(get_elapsed_seconds())
    }

    /// Return all commands whose execution time is before `current_time_s`.
    pub fn get_pending_at(&mut self, current_time_s: f64) -> Pending<T> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return Pending::EndOfScript
        }

        let mut cmd_vec: Vec<T> = vec![];

        while let Some(front) = self.cmds.front() {
            if front.exec_time_s >= current_time_s {
                break;
            }

            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        if cmd_vec.is_empty() {
            Pending::None
        }
        else {
            Pending::Some(cmd_vec)
        }
    }

    /// Get the number of commands left in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
