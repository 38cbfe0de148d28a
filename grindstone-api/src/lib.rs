//! # Grindstone Worker Lifecycle API
//!
//! Grindstone describes how a load-generation worker process brings up its
//! state: one-off process initialisation, one runner per worker thread, and
//! repeated invocations of that runner for every test run assigned to the
//! thread.
//!
//! ## Core Components
//!
//! - **Process Initializer**: runs once per process before any worker thread
//!   exists and produces the factory every thread builds its runner from
//! - **Runner Factory**: builds one runner per worker thread
//! - **Thread Runner**: thread-private state, invoked once per test run
//! - **Logger / Clock**: external collaborators consumed through narrow seams
//!
//! ## Usage Example
//!
//! ```rust
//! use grindstone_api::{ThreadRunner, RunResult, WorkerThreadId};
//!
//! struct CountingRunner {
//!     thread_id: WorkerThreadId,
//!     runs: u64,
//! }
//!
//! impl ThreadRunner for CountingRunner {
//!     fn run(&mut self) -> RunResult {
//!         self.runs += 1;
//!         Ok(())
//!     }
//!
//!     fn thread_id(&self) -> WorkerThreadId {
//!         self.thread_id
//!     }
//!
//!     fn runs(&self) -> u64 {
//!         self.runs
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`runner`]: process initializer, runner factory and runner traits
//! - [`sink`]: logger and clock seams
//! - [`errors`]: error types
//! - [`types`]: common type definitions

pub mod errors;
pub mod runner;
pub mod sink;
pub mod types;

pub use errors::{ConcurrencyViolationError, InitializationError, LoggingError, RunError};
pub use runner::{ProcessInitializer, RunnerFactory, ThreadRunner};
pub use sink::{Clock, Logger};
pub use types::{RunResult, Timestamp, WorkerThreadId};
