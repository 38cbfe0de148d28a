use std::sync::Arc;

use crate::errors::{InitializationError, LoggingError};
use crate::types::Timestamp;

/// Append-only sink for formatted text lines.
///
/// Lines written from different threads interleave in no particular order.
pub trait Logger: Send + Sync {
    fn output(&self, line: &str) -> Result<(), LoggingError>;
}

/// Source of the current point in time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<Timestamp, InitializationError>;
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn output(&self, line: &str) -> Result<(), LoggingError> {
        (**self).output(line)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Result<Timestamp, InitializationError> {
        (**self).now()
    }
}
