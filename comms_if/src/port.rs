//! # Ports
//!
//! Ports carry typed samples between a task and its host. The host pushes samples into a task's
//! [`InputPort`]s and drains the samples the task wrote to its [`OutputPort`]s. Neither side ever
//! blocks: reading a port with nothing in it is a normal outcome, not an error.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A port from which a task reads the newest sample pushed by its host.
#[derive(Debug, Clone)]
pub struct InputPort<T> {
    name: &'static str,
    sample: Option<T>,
    fresh: bool,
}

/// A port to which a task writes samples for its host to collect.
#[derive(Debug, Clone)]
pub struct OutputPort<T> {
    name: &'static str,
    pending: Vec<T>,
    last: Option<T>,
    num_writes: u64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Result of reading an [`InputPort`].
#[derive(Debug, Clone, PartialEq)]
pub enum PortRead<T> {
    /// Nothing has ever been pushed into the port.
    NoData,

    /// The sample has already been read before.
    OldData(T),

    /// The sample has not been read before.
    NewData(T),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T: Clone> InputPort<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sample: None,
            fresh: false,
        }
    }

    /// Push a sample into the port, replacing any sample not yet read.
    pub fn push(&mut self, sample: T) {
        self.sample = Some(sample);
        self.fresh = true;
    }

    /// Read the newest sample in the port.
    pub fn read_newest(&mut self) -> PortRead<T> {
        match self.sample {
            Some(ref s) if self.fresh => {
                self.fresh = false;
                trace!("New data on port {}", self.name);
                PortRead::NewData(s.clone())
            }
            Some(ref s) => PortRead::OldData(s.clone()),
            None => PortRead::NoData,
        }
    }

    /// Drop any sample held by the port.
    pub fn clear(&mut self) {
        self.sample = None;
        self.fresh = false;
    }
}

impl<T: Clone> OutputPort<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: Vec::new(),
            last: None,
            num_writes: 0,
        }
    }

    /// Write a sample to the port.
    pub fn write(&mut self, sample: T) {
        trace!("Write on port {}", self.name);
        self.last = Some(sample.clone());
        self.pending.push(sample);
        self.num_writes += 1;
    }

    /// Take all samples written since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    /// The most recently written sample.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Total number of writes since the port was created.
    pub fn num_writes(&self) -> u64 {
        self.num_writes
    }
}

impl<T> PortRead<T> {
    /// Get the sample regardless of whether it is new or old.
    pub fn sample(self) -> Option<T> {
        match self {
            PortRead::NewData(s) | PortRead::OldData(s) => Some(s),
            PortRead::NoData => None,
        }
    }

    /// Get the sample only if it is new.
    pub fn new_sample(self) -> Option<T> {
        match self {
            PortRead::NewData(s) => Some(s),
            _ => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
