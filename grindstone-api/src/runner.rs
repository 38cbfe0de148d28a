use crate::errors::InitializationError;
use crate::types::{RunResult, WorkerThreadId};

/// One-off setup for a worker process.
///
/// Consumed by `initialise`, so it can run at most once. Runs before any
/// worker thread exists; a failure here stops the process from spawning
/// threads.
pub trait ProcessInitializer {
    /// Factory every worker thread builds its runner from
    type Factory: RunnerFactory;

    /// Allocate process-wide state and return the runner factory
    fn initialise(self) -> Result<Self::Factory, InitializationError>;
}

/// Builds one runner per worker thread.
///
/// Shared by every worker thread of the process, hence `Send + Sync`.
pub trait RunnerFactory: Send + Sync {
    /// Runner type built for each thread
    type Runner: ThreadRunner;

    /// Build the runner for `thread_id`. Called on the worker thread itself.
    fn create(&self, thread_id: WorkerThreadId) -> Result<Self::Runner, InitializationError>;
}

/// Thread-private runner, invoked once per test run.
///
/// The worker pool invokes `run` strictly sequentially on the thread that
/// built the runner.
pub trait ThreadRunner {
    /// Perform one test run
    fn run(&mut self) -> RunResult;

    /// Identifier of the owning worker thread
    fn thread_id(&self) -> WorkerThreadId;

    /// Number of invocations that have applied their updates
    fn runs(&self) -> u64;
}
