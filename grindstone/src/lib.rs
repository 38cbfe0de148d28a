// Grindstone Worker Lifecycle Implementation
//
// This crate implements the grindstone lifecycle API: an atomically shared
// process state, a per-thread script runner, and a thread-based worker pool
// that drives them.

pub mod exit;
pub mod lifecycle;
pub mod logging;
pub mod pool;

// Re-export commonly used types
pub use exit::ProcessExit;
pub use lifecycle::*;
pub use pool::{PoolError, PoolReport, StopHandle, ThreadOutcome, ThreadStatus, WorkerPool, WorkerPoolConfig};
pub use grindstone_api::*;
