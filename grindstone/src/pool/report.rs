use std::time::Duration;

use grindstone_api::errors::InitializationError;
use grindstone_api::WorkerThreadId;

/// How a worker thread ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadStatus {
    /// Spawned, but no terminal event arrived yet
    Pending,
    /// Completed every configured run
    Finished,
    /// Left its loop because the pool asked it to stop
    Stopped,
    /// Its runner could not be built; it performed no runs
    InitializationFailed(InitializationError),
    /// A fatal run error ended the thread
    Aborted(String),
    /// The thread panicked
    Panicked(String),
    /// Still running when the shutdown timeout expired
    Unresponsive,
}

/// Per-thread results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadOutcome {
    pub thread_id: WorkerThreadId,
    pub status: ThreadStatus,
    /// Invocations that applied their counter updates
    pub runs_completed: u64,
    /// Invocations whose log output was rejected
    pub logging_failures: u64,
    /// Message of the most recent non-fatal invocation failure
    pub last_error: Option<String>,
}

impl ThreadOutcome {
    pub(crate) fn pending(thread_id: WorkerThreadId) -> Self {
        Self {
            thread_id,
            status: ThreadStatus::Pending,
            runs_completed: 0,
            logging_failures: 0,
            last_error: None,
        }
    }
}

/// Summary of one `WorkerPool::run`
#[derive(Debug, Clone)]
pub struct PoolReport {
    pub threads: Vec<ThreadOutcome>,
    pub elapsed: Duration,
    /// Whether a caller asked the pool to stop through a `StopHandle`
    pub stop_requested: bool,
    /// Whether the configured duration ran out before the threads finished
    pub duration_expired: bool,
}

impl PoolReport {
    pub fn thread(&self, thread_id: WorkerThreadId) -> Option<&ThreadOutcome> {
        self.threads.iter().find(|t| t.thread_id == thread_id)
    }

    /// Sum of completed runs across all threads
    pub fn total_runs(&self) -> u64 {
        self.threads.iter().map(|t| t.runs_completed).sum()
    }

    pub fn logging_failures(&self) -> u64 {
        self.threads.iter().map(|t| t.logging_failures).sum()
    }

    pub fn initialization_failures(&self) -> usize {
        self.count(|s| matches!(s, ThreadStatus::InitializationFailed(_)))
    }

    pub fn unresponsive_threads(&self) -> usize {
        self.count(|s| *s == ThreadStatus::Unresponsive)
    }

    /// Every thread completed all of its runs
    pub fn all_finished(&self) -> bool {
        self.threads.iter().all(|t| t.status == ThreadStatus::Finished)
    }

    fn count(&self, predicate: impl Fn(&ThreadStatus) -> bool) -> usize {
        self.threads.iter().filter(|t| predicate(&t.status)).count()
    }
}
