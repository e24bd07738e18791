//! Module interfaces
//!
//! Every periodic task in `nav_exec` implements [`Task`]. Tasks are not
//! scheduled by themselves: the host wraps them in a [`TaskRunner`], which
//! drives the lifecycle hooks and refuses any hook that is illegal in the
//! task's current state.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};
use thiserror::Error;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A periodic task.
pub trait Task {
    /// Configuration applied by `configure`.
    type Config;
    /// An error which can occur in the configure or start hooks.
    type Error: std::error::Error;

    /// Apply a new configuration. Called between active periods only.
    fn configure(&mut self, config: Self::Config) -> Result<(), Self::Error>;

    /// Prepare for the first cycle of an active period.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Run one cycle. A cycle always runs to completion, any failure is
    /// reported through the task's outputs.
    fn update(&mut self);

    /// End the active period.
    fn stop(&mut self);

    /// Release everything acquired by `configure`.
    fn cleanup(&mut self);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives a [`Task`] through its lifecycle.
pub struct TaskRunner<T: Task> {
    name: &'static str,
    task: T,
    state: TaskState,
    num_cycles: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TaskState {
    Unconfigured,
    Stopped,
    Running,
}

/// A lifecycle operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleOp {
    Configure,
    Start,
    Stop,
    Cleanup,
}

#[derive(Debug, Error)]
pub enum LifecycleError<E: std::error::Error + 'static> {
    #[error("Cannot {op:?} a task in the {state:?} state")]
    InvalidTransition { op: LifecycleOp, state: TaskState },

    #[error("Task hook failed: {0}")]
    Hook(#[source] E),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: Task> TaskRunner<T>
where
    T::Error: 'static
{
    pub fn new(name: &'static str, task: T) -> Self {
        Self {
            name,
            task,
            state: TaskState::Unconfigured,
            num_cycles: 0,
        }
    }

    /// Configure the task, legal while it isn't running.
    pub fn configure(&mut self, config: T::Config) -> Result<(), LifecycleError<T::Error>> {
        self.check(LifecycleOp::Configure, &[TaskState::Unconfigured, TaskState::Stopped])?;

        // A failed configure leaves the task unconfigured so it can't be started
        match self.task.configure(config) {
            Ok(()) => {
                self.state = TaskState::Stopped;
                info!("{} configured", self.name);
                Ok(())
            }
            Err(e) => {
                self.state = TaskState::Unconfigured;
                Err(LifecycleError::Hook(e))
            }
        }
    }

    /// Start an active period.
    pub fn start(&mut self) -> Result<(), LifecycleError<T::Error>> {
        self.check(LifecycleOp::Start, &[TaskState::Stopped])?;

        self.task.start().map_err(LifecycleError::Hook)?;
        self.state = TaskState::Running;
        self.num_cycles = 0;
        info!("{} started", self.name);

        Ok(())
    }

    /// Run one cycle if the task is running.
    ///
    /// Returns `false` without touching the task if it isn't running.
    pub fn update(&mut self) -> bool {
        if self.state != TaskState::Running {
            warn!("{} is {:?}, update ignored", self.name, self.state);
            return false;
        }

        self.task.update();
        self.num_cycles += 1;
        true
    }

    /// End the active period.
    pub fn stop(&mut self) -> Result<(), LifecycleError<T::Error>> {
        self.check(LifecycleOp::Stop, &[TaskState::Running])?;

        self.task.stop();
        self.state = TaskState::Stopped;
        info!("{} stopped after {} cycles", self.name, self.num_cycles);

        Ok(())
    }

    /// Release the task's configuration.
    pub fn cleanup(&mut self) -> Result<(), LifecycleError<T::Error>> {
        self.check(LifecycleOp::Cleanup, &[TaskState::Stopped])?;

        self.task.cleanup();
        self.state = TaskState::Unconfigured;
        info!("{} cleaned up", self.name);

        Ok(())
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Number of cycles run in the current (or last) active period.
    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    /// Mutable access to the task, used by the host to reach its ports.
    pub fn task_mut(&mut self) -> &mut T {
        &mut self.task
    }

    fn check(
        &self,
        op: LifecycleOp,
        allowed: &[TaskState]
    ) -> Result<(), LifecycleError<T::Error>> {
        if allowed.contains(&self.state) {
            Ok(())
        }
        else {
            Err(LifecycleError::InvalidTransition { op, state: self.state })
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
