use std::fmt;

use chrono::{DateTime, Utc};

use crate::errors::RunError;

// Type aliases for common types
pub type Timestamp = DateTime<Utc>;
pub type RunResult = Result<(), RunError>;

/// Identifier the worker pool assigns to a worker thread.
///
/// Unique among the threads that are alive in one process at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerThreadId(usize);

impl WorkerThreadId {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl From<usize> for WorkerThreadId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Display for WorkerThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
