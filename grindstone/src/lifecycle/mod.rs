//! # Script Lifecycle Module
//!
//! The state model of a load-generation script: process-wide state created
//! once, one runner per worker thread, one `run` per test iteration.
//!
//! ## Key Concepts
//! - `ScriptLifecycle`: process initializer, runs before any worker thread
//! - `ScriptProcess`: owns the shared `ProcessState` and builds runners
//! - `LifecycleRunner`: thread-private counters plus the shared total
//!
//! ## Thread Safety
//! - Only `ProcessState` is shared, and it is updated atomically
//! - Runners are owned by one thread and never locked

mod process;
mod runner;
mod sinks;
mod state;

pub use process::{ScriptLifecycle, ScriptProcess};
pub use runner::{EVEN_THREAD_LINE, LifecycleRunner};
pub use sinks::{FileLogger, SystemClock, TracingLogger, WriterLogger};
pub use state::ProcessState;
