use crate::pool::{PoolError, PoolReport};

/// Exit status a worker process reports to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Every worker ran its course or the duration limit was reached
    Natural,
    /// The run was cut short by a stop request
    Stopped,
    /// The process initializer failed; no worker thread was started
    InitializationFailed,
    /// The pool itself failed
    Error,
}

impl ProcessExit {
    pub fn code(self) -> i32 {
        match self {
            ProcessExit::Natural => 0,
            ProcessExit::Stopped => 18,
            ProcessExit::InitializationFailed => -2,
            ProcessExit::Error => -3,
        }
    }

    pub fn from_report(report: &PoolReport) -> Self {
        if report.stop_requested {
            ProcessExit::Stopped
        } else {
            ProcessExit::Natural
        }
    }

    pub fn from_error(error: &PoolError) -> Self {
        match error {
            PoolError::Initialization(_) => ProcessExit::InitializationFailed,
            _ => ProcessExit::Error,
        }
    }

    pub fn from_result(result: &Result<PoolReport, PoolError>) -> Self {
        match result {
            Ok(report) => Self::from_report(report),
            Err(error) => Self::from_error(error),
        }
    }
}
