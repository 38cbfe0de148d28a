use std::time::Duration;

pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a `WorkerPool`.
#[derive(Clone, Debug)]
pub struct WorkerPoolConfig {
    /// Number of worker threads, each with its own runner. Defaults to one.
    pub threads: usize,

    /// Invocations per thread. Zero means keep running until stopped.
    pub runs: u64,

    /// Stop the pool after this long, if set.
    pub duration: Option<Duration>,

    /// How long to wait for threads to notice a stop request.
    pub shutdown_timeout: Duration,

    /// How often the pool checks its deadlines while waiting on workers.
    pub poll_interval: Duration,

    /// Prefix for worker thread names; the thread id is appended.
    pub thread_name_prefix: String,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            runs: 1,
            duration: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            poll_interval: Duration::from_millis(10),
            thread_name_prefix: "grindstone-worker-".to_string(),
        }
    }
}

impl WorkerPoolConfig {
    /// Default settings with one worker thread per logical CPU
    pub fn per_cpu() -> Self {
        Self::default().with_threads(num_cpus::get())
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_runs(mut self, runs: u64) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Check the settings a pool cannot start with
    pub fn validate(&self) -> Result<(), String> {
        if self.thread_name_prefix.contains('\0') {
            return Err("thread name prefix contains a NUL byte".to_string());
        }
        if self.poll_interval.is_zero() {
            return Err("poll interval must be non-zero".to_string());
        }
        Ok(())
    }

    pub(crate) fn thread_name(&self, thread_id: usize) -> String {
        format!("{}{}", self.thread_name_prefix, thread_id)
    }
}
