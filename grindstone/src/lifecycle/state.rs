use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide state shared by every runner in one worker process.
///
/// Created once by the process initializer, before any worker thread, and
/// handed to each runner behind an `Arc`.
///
/// # Thread Safety
/// - `total_runs` is updated with a single atomic read-modify-write, so
///   concurrent increments are never lost or doubled
/// - The value returned by `record_run` includes the caller's own increment
///   and every increment that happened-before it
#[derive(Debug, Default)]
pub struct ProcessState {
    total_runs: AtomicU64,
}

impl ProcessState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one run and return the total including it
    pub fn record_run(&self) -> u64 {
        self.total_runs.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Runs counted so far
    pub fn total_runs(&self) -> u64 {
        self.total_runs.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_run_returns_post_increment_value() {
        let state = ProcessState::new();
        assert_eq!(state.total_runs(), 0);
        assert_eq!(state.record_run(), 1);
        assert_eq!(state.record_run(), 2);
        assert_eq!(state.total_runs(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let state = Arc::new(ProcessState::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    let mut last_seen = 0;
                    for _ in 0..10_000 {
                        let total = state.record_run();
                        assert!(total > last_seen);
                        last_seen = total;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(state.total_runs(), 80_000);
    }
}
