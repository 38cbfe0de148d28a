use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use grindstone_api::errors::{ConcurrencyViolationError, InitializationError};
use grindstone_api::{Clock, Logger, RunResult, ThreadRunner, Timestamp, WorkerThreadId};

use super::state::ProcessState;

/// Line emitted on every run by runners with an even thread id
pub const EVEN_THREAD_LINE: &str = "I have an even thread ID.";

/// Script runner built once per worker thread.
///
/// ## Thread-private state
/// - `runs_for_thread`: incremented once per invocation, never shared
/// - `initialization_timestamp` and `thread_id`: fixed at construction
///
/// ## Shared state
/// - `state`: the process-wide counter, incremented atomically on every run
///
/// The runner remembers the OS thread that built it. Invoking it from any
/// other thread is a scheduling bug in the worker pool and is rejected with
/// a `ConcurrencyViolationError` before any state is touched.
pub struct LifecycleRunner {
    thread_id: WorkerThreadId,
    initialization_timestamp: Timestamp,
    runs_for_thread: u64,
    owner: ThreadId,
    state: Arc<ProcessState>,
    logger: Arc<dyn Logger>,
}

impl fmt::Debug for LifecycleRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleRunner")
            .field("thread_id", &self.thread_id)
            .field("initialization_timestamp", &self.initialization_timestamp)
            .field("runs_for_thread", &self.runs_for_thread)
            .field("owner", &self.owner)
            .finish()
    }
}

impl LifecycleRunner {
    /// Build the runner for `thread_id` on the calling thread
    ///
    /// Captures the current time and logs the thread's start. Fails if the
    /// clock cannot produce a timestamp or the sink refuses the start line.
    pub fn new(
        thread_id: WorkerThreadId,
        state: Arc<ProcessState>,
        logger: Arc<dyn Logger>,
        clock: &dyn Clock,
    ) -> Result<Self, InitializationError> {
        let initialization_timestamp = clock.now()?;

        logger
            .output(&format!(
                "New thread started at time {}",
                initialization_timestamp.timestamp_millis()
            ))
            .map_err(|e| InitializationError::LogSinkUnavailable(e.to_string()))?;

        Ok(Self {
            thread_id,
            initialization_timestamp,
            runs_for_thread: 0,
            owner: thread::current().id(),
            state,
            logger,
        })
    }

    pub fn initialization_timestamp(&self) -> Timestamp {
        self.initialization_timestamp
    }

    pub fn runs_for_thread(&self) -> u64 {
        self.runs_for_thread
    }

    fn check_owner(&self) -> Result<(), ConcurrencyViolationError> {
        let caller = thread::current().id();
        if caller == self.owner {
            return Ok(());
        }

        Err(ConcurrencyViolationError {
            thread_id: self.thread_id,
            owner: format!("{:?}", self.owner),
            caller: format!("{:?}", caller),
        })
    }
}

impl ThreadRunner for LifecycleRunner {
    fn run(&mut self) -> RunResult {
        self.check_owner()?;

        // Both counters are applied before anything is logged.
        let total_runs = self.state.record_run();
        self.runs_for_thread += 1;

        self.logger.output(&format!(
            "runsForThread={}, totalNumberOfRuns={}, initialisationTime={}",
            self.runs_for_thread,
            total_runs,
            self.initialization_timestamp.timestamp_millis()
        ))?;

        if self.thread_id.is_even() {
            self.logger.output(EVEN_THREAD_LINE)?;
        }

        Ok(())
    }

    fn thread_id(&self) -> WorkerThreadId {
        self.thread_id
    }

    fn runs(&self) -> u64 {
        self.runs_for_thread
    }
}
