//! # Worker Thread Module
//!
//! One OS thread per worker. Each worker builds its runner on its own thread
//! and then invokes it sequentially until its run budget is spent or the
//! pool raises the stop flag.
//!
//! ## Core Algorithm
//! 1. Build the runner through the shared factory
//! 2. Check the stop flag, invoke `run`, repeat
//! 3. Report every notable event to the pool over a channel
//!
//! The stop flag is only checked between invocations.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use grindstone_api::errors::{InitializationError, RunError};
use grindstone_api::{RunnerFactory, ThreadRunner, WorkerThreadId};
use tracing::{debug, warn};

/// Events a worker sends to the pool
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    /// Runner built; invocations are about to start
    Started { thread_id: WorkerThreadId },
    /// Runner could not be built; the thread exits
    InitializationFailed {
        thread_id: WorkerThreadId,
        error: InitializationError,
    },
    /// A non-fatal invocation failure
    InvocationFailed {
        thread_id: WorkerThreadId,
        error: RunError,
    },
    /// Loop ended normally
    Finished {
        thread_id: WorkerThreadId,
        runs: u64,
        stopped: bool,
    },
    /// A fatal invocation failure ended the loop
    Aborted {
        thread_id: WorkerThreadId,
        runs: u64,
        error: RunError,
    },
}

impl WorkerEvent {
    pub(crate) fn thread_id(&self) -> WorkerThreadId {
        match self {
            WorkerEvent::Started { thread_id }
            | WorkerEvent::InitializationFailed { thread_id, .. }
            | WorkerEvent::InvocationFailed { thread_id, .. }
            | WorkerEvent::Finished { thread_id, .. }
            | WorkerEvent::Aborted { thread_id, .. } => *thread_id,
        }
    }

    /// Whether this is the last event the worker sends
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerEvent::InitializationFailed { .. }
                | WorkerEvent::Finished { .. }
                | WorkerEvent::Aborted { .. }
        )
    }
}

/// Worker that drives one runner on a dedicated thread
pub(crate) struct Worker<F> {
    thread_id: WorkerThreadId,
    factory: Arc<F>,
    stop: Arc<AtomicBool>,
    runs: u64,
    events: flume::Sender<WorkerEvent>,
}

impl<F> Worker<F>
where
    F: RunnerFactory + 'static,
{
    pub(crate) fn new(
        thread_id: WorkerThreadId,
        factory: Arc<F>,
        stop: Arc<AtomicBool>,
        runs: u64,
        events: flume::Sender<WorkerEvent>,
    ) -> Self {
        Self {
            thread_id,
            factory,
            stop,
            runs,
            events,
        }
    }

    /// Spawn the worker thread
    pub(crate) fn spawn(self, name: String) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name).spawn(move || self.run_loop())
    }

    fn run_loop(self) {
        let span = crate::worker_span!(self.thread_id);
        let _guard = span.enter();

        let mut runner = match self.factory.create(self.thread_id) {
            Ok(runner) => runner,
            Err(error) => {
                warn!("Thread could not initialise runner: {}", error);
                self.send(WorkerEvent::InitializationFailed {
                    thread_id: self.thread_id,
                    error,
                });
                return;
            }
        };

        self.send(WorkerEvent::Started {
            thread_id: self.thread_id,
        });
        crate::log_worker!(self.thread_id, "started", runs = self.runs);

        let mut invocations: u64 = 0;
        while self.runs == 0 || invocations < self.runs {
            if self.stop.load(Ordering::Acquire) {
                break;
            }

            invocations += 1;
            match runner.run() {
                Ok(()) => {}
                Err(error) if error.is_fatal() => {
                    crate::log_error!(error, thread_id = %self.thread_id);
                    self.send(WorkerEvent::Aborted {
                        thread_id: self.thread_id,
                        runs: runner.runs(),
                        error,
                    });
                    return;
                }
                Err(error) => {
                    debug!("Invocation {} failed: {}", invocations, error);
                    self.send(WorkerEvent::InvocationFailed {
                        thread_id: self.thread_id,
                        error,
                    });
                }
            }
        }

        let stopped = self.runs == 0 || invocations < self.runs;
        crate::log_worker!(self.thread_id, "finished", runs = runner.runs(), stopped = stopped);
        self.send(WorkerEvent::Finished {
            thread_id: self.thread_id,
            runs: runner.runs(),
            stopped,
        });
    }

    // The pool may have stopped listening after its shutdown timeout.
    fn send(&self, event: WorkerEvent) {
        let _ = self.events.send(event);
    }
}
