use std::fmt;
use std::sync::Arc;

use grindstone_api::errors::InitializationError;
use grindstone_api::{Clock, Logger, ProcessInitializer, RunnerFactory, WorkerThreadId};

use super::runner::LifecycleRunner;
use super::sinks::{SystemClock, TracingLogger};
use super::state::ProcessState;

/// Process initializer for the script lifecycle.
///
/// Holds the collaborators every runner needs. `initialise` checks the clock
/// once, allocates the single `ProcessState` and returns the factory the
/// worker threads build their runners from. Nothing is logged here; output
/// starts with the first runner.
pub struct ScriptLifecycle {
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl ScriptLifecycle {
    pub fn new(logger: Arc<dyn Logger>, clock: Arc<dyn Clock>) -> Self {
        Self { logger, clock }
    }
}

impl Default for ScriptLifecycle {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogger), Arc::new(SystemClock))
    }
}

impl fmt::Debug for ScriptLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptLifecycle").finish_non_exhaustive()
    }
}

impl ProcessInitializer for ScriptLifecycle {
    type Factory = ScriptProcess;

    fn initialise(self) -> Result<ScriptProcess, InitializationError> {
        // Fail the whole process up front rather than every thread later.
        self.clock.now()?;

        Ok(ScriptProcess {
            state: Arc::new(ProcessState::new()),
            logger: self.logger,
            clock: self.clock,
        })
    }
}

/// Initialised script process: owns the shared state and builds runners.
pub struct ScriptProcess {
    state: Arc<ProcessState>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl ScriptProcess {
    /// The process-wide state every runner shares
    pub fn state(&self) -> &Arc<ProcessState> {
        &self.state
    }

    pub fn total_runs(&self) -> u64 {
        self.state.total_runs()
    }
}

impl fmt::Debug for ScriptProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptProcess")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RunnerFactory for ScriptProcess {
    type Runner = LifecycleRunner;

    fn create(&self, thread_id: WorkerThreadId) -> Result<LifecycleRunner, InitializationError> {
        LifecycleRunner::new(
            thread_id,
            Arc::clone(&self.state),
            Arc::clone(&self.logger),
            self.clock.as_ref(),
        )
    }
}
