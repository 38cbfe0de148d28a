//! # Worker Pool Module
//!
//! A reference driver for the script lifecycle: initialise the process once,
//! spawn one thread per worker, let every thread build its own runner and
//! invoke it for its share of test runs.
//!
//! ## Key Concepts
//! - Dedicated threads: one named OS thread per worker
//! - Graceful stop: a shared flag, checked between invocations only
//! - Event reporting: workers report over a `flume` channel, the pool folds
//!   the events into a `PoolReport`
//!
//! ## Shutdown
//! A stop comes from a `StopHandle` or from the configured duration. Once
//! raised, the pool waits up to `shutdown_timeout` for the threads to leave
//! their loops and then returns regardless; threads still running are
//! reported as unresponsive and left detached.

mod config;
mod error;
mod report;
mod worker;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::anyhow;
use grindstone_api::{ProcessInitializer, RunnerFactory, WorkerThreadId};
use tracing::{info, warn};

pub use config::{DEFAULT_SHUTDOWN_TIMEOUT, WorkerPoolConfig};
pub use error::PoolError;
pub use report::{PoolReport, ThreadOutcome, ThreadStatus};

use self::worker::{Worker, WorkerEvent};

/// Requests a graceful stop of a running pool from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Runs a fixed set of worker threads to completion. Single use.
pub struct WorkerPool {
    config: WorkerPoolConfig,
    stop: Arc<AtomicBool>,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.config.threads)
            .field("runs", &self.config.runs)
            .field("stop_requested", &self.stop.load(Ordering::Relaxed))
            .finish()
    }
}

impl WorkerPool {
    pub fn new(config: WorkerPoolConfig) -> Self {
        Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    /// Initialise the process and run its workers
    ///
    /// The initializer runs on the calling thread before any worker exists.
    /// If it fails, no thread is spawned. On success the factory is returned
    /// alongside the report so callers can inspect the process-wide state.
    pub fn run_process<I>(self, initializer: I) -> Result<(Arc<I::Factory>, PoolReport), PoolError>
    where
        I: ProcessInitializer,
        I::Factory: 'static,
    {
        self.config.validate().map_err(PoolError::InvalidConfig)?;

        let factory = Arc::new(initializer.initialise()?);
        let report = self.run(Arc::clone(&factory))?;
        Ok((factory, report))
    }

    /// Run every worker against an already initialised factory
    pub fn run<F>(self, factory: Arc<F>) -> Result<PoolReport, PoolError>
    where
        F: RunnerFactory + 'static,
    {
        self.config.validate().map_err(PoolError::InvalidConfig)?;

        let started_at = Instant::now();
        let (events_tx, events_rx) = flume::unbounded();

        info!(threads = self.config.threads, runs = self.config.runs, "starting threads");

        let mut handles: Vec<(WorkerThreadId, JoinHandle<()>)> =
            Vec::with_capacity(self.config.threads);
        for index in 0..self.config.threads {
            let thread_id = WorkerThreadId::new(index);
            let worker = Worker::new(
                thread_id,
                Arc::clone(&factory),
                Arc::clone(&self.stop),
                self.config.runs,
                events_tx.clone(),
            );

            match worker.spawn(self.config.thread_name(index)) {
                Ok(handle) => handles.push((thread_id, handle)),
                Err(e) => {
                    // Bring down what is already running before reporting.
                    self.stop.store(true, Ordering::Release);
                    for (_, handle) in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::ThreadSpawn {
                        thread_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        // Only workers hold senders now, so a disconnect means they are all gone.
        drop(events_tx);

        let mut outcomes: HashMap<WorkerThreadId, ThreadOutcome> = handles
            .iter()
            .map(|(id, _)| (*id, ThreadOutcome::pending(*id)))
            .collect();

        let wait = self.collect_events(&events_rx, &mut outcomes, started_at)?;

        for (thread_id, handle) in handles {
            let Some(outcome) = outcomes.get_mut(&thread_id) else {
                continue;
            };

            // A thread that never reported its end and is still alive after
            // the shutdown timeout is left behind.
            if wait.timed_out && outcome.status == ThreadStatus::Pending && !handle.is_finished() {
                outcome.status = ThreadStatus::Unresponsive;
                continue;
            }

            if let Err(payload) = handle.join() {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(thread_id = %thread_id, "worker thread panicked: {}", message);
                outcome.status = ThreadStatus::Panicked(message);
            }
        }

        // Threads that ended after the wait gave up still have their last
        // events queued.
        drain_events(&events_rx, &mut outcomes);

        let mut threads: Vec<ThreadOutcome> = outcomes.into_values().collect();
        threads.sort_by_key(|t| t.thread_id);

        let report = PoolReport {
            threads,
            elapsed: started_at.elapsed(),
            stop_requested: !wait.duration_expired && self.stop.load(Ordering::Acquire),
            duration_expired: wait.duration_expired,
        };

        info!(
            total_runs = report.total_runs(),
            logging_failures = report.logging_failures(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "worker threads finished"
        );

        Ok(report)
    }

    fn collect_events(
        &self,
        events: &flume::Receiver<WorkerEvent>,
        outcomes: &mut HashMap<WorkerThreadId, ThreadOutcome>,
        started_at: Instant,
    ) -> Result<WaitOutcome, PoolError> {
        let run_deadline = self.config.duration.map(|d| started_at + d);
        let mut shutdown_deadline: Option<Instant> = None;
        let mut live = outcomes.len();
        let mut wait = WaitOutcome::default();

        if let Some(duration) = self.config.duration {
            info!("will shut down after {} ms", duration.as_millis());
        }

        while live > 0 {
            let now = Instant::now();
            match shutdown_deadline {
                None => {
                    if self.stop.load(Ordering::Acquire) {
                        info!("stop requested");
                    } else if run_deadline.is_some_and(|deadline| now >= deadline) {
                        info!("specified duration exceeded, shutting down");
                        wait.duration_expired = true;
                        self.stop.store(true, Ordering::Release);
                    }
                    if self.stop.load(Ordering::Acquire) {
                        info!("waiting for threads to terminate");
                        shutdown_deadline = Some(now + self.config.shutdown_timeout);
                    }
                }
                Some(deadline) if now >= deadline => {
                    warn!("threads not terminating, continuing anyway");
                    wait.timed_out = true;
                    return Ok(wait);
                }
                Some(_) => {}
            }

            let event = match events.recv_timeout(self.config.poll_interval) {
                Ok(event) => event,
                Err(flume::RecvTimeoutError::Timeout) => continue,
                Err(flume::RecvTimeoutError::Disconnected) => break,
            };

            let thread_id = event.thread_id();
            let Some(outcome) = outcomes.get_mut(&thread_id) else {
                return Err(anyhow!("event from unknown worker thread {}", thread_id).into());
            };
            if event.is_terminal() {
                live -= 1;
            }
            apply_event(outcome, event);
        }

        Ok(wait)
    }
}

/// How the wait for worker events ended
#[derive(Debug, Default)]
struct WaitOutcome {
    /// The shutdown timeout expired with threads still running
    timed_out: bool,
    /// The configured duration triggered the stop
    duration_expired: bool,
}

fn drain_events(
    events: &flume::Receiver<WorkerEvent>,
    outcomes: &mut HashMap<WorkerThreadId, ThreadOutcome>,
) {
    for event in events.try_iter() {
        if let Some(outcome) = outcomes.get_mut(&event.thread_id()) {
            apply_event(outcome, event);
        }
    }
}

fn apply_event(outcome: &mut ThreadOutcome, event: WorkerEvent) {
    match event {
        WorkerEvent::Started { .. } => {}
        WorkerEvent::InitializationFailed { error, .. } => {
            outcome.status = ThreadStatus::InitializationFailed(error);
        }
        WorkerEvent::InvocationFailed { error, .. } => {
            outcome.logging_failures += 1;
            outcome.last_error = Some(error.to_string());
        }
        WorkerEvent::Finished { runs, stopped, .. } => {
            outcome.runs_completed = runs;
            outcome.status = if stopped {
                ThreadStatus::Stopped
            } else {
                ThreadStatus::Finished
            };
        }
        WorkerEvent::Aborted { runs, error, .. } => {
            outcome.runs_completed = runs;
            outcome.status = ThreadStatus::Aborted(error.to_string());
        }
    }
}
