//! # Lifecycle Error Types
//!
//! Errors raised while bringing up a worker process, building a thread's
//! runner, or invoking it.
//!
//! ## Error Scopes
//!
//! - `InitializationError`: fatal to the scope that raised it. A failure in
//!   the process initializer stops the process before any thread is spawned;
//!   a failure while building a runner aborts only that thread.
//! - `LoggingError`: the log sink rejected a line. Non-fatal; the invocation
//!   has already applied its counter updates.
//! - `ConcurrencyViolationError`: a runner was invoked away from the thread
//!   that built it. Points at a scheduling bug in the worker pool and is
//!   fatal to that thread.
//!
//! ## Usage Example
//!
//! ```rust
//! use grindstone_api::errors::{LoggingError, RunError};
//!
//! fn classify(error: &RunError) -> &'static str {
//!     if error.is_fatal() { "abort thread" } else { "keep going" }
//! }
//!
//! let error = RunError::from(LoggingError::Rejected("sink closed".to_string()));
//! assert_eq!(classify(&error), "keep going");
//! ```

use std::io;

use thiserror::Error;

use crate::types::WorkerThreadId;

/// Failure to acquire a resource needed by the process or by one thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// The clock could not produce a timestamp.
    #[error("Clock unavailable: {0}")]
    ClockUnavailable(String),

    /// The log sink could not accept the startup line.
    #[error("Log sink unavailable: {0}")]
    LogSinkUnavailable(String),

    /// Any other resource the initializer depends on.
    #[error("Failed to acquire resource: {0}")]
    Resource(String),
}

/// Failure of the log sink to accept a line.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Log sink rejected write: {0}")]
    Rejected(String),
    #[error("Log sink I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("Log sink lock poisoned")]
    Poisoned,
}

/// A runner was invoked from a thread other than the one that built it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Runner for worker thread {thread_id} built on {owner} but invoked on {caller}")]
pub struct ConcurrencyViolationError {
    pub thread_id: WorkerThreadId,
    pub owner: String,
    pub caller: String,
}

/// Errors returned by a single runner invocation.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    ConcurrencyViolation(#[from] ConcurrencyViolationError),
}

impl RunError {
    /// Whether the owning thread must stop invoking its runner.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunError::ConcurrencyViolation(_))
    }
}
