//! # Logger and Clock Implementations
//!
//! - `TracingLogger`: forwards script lines to the `tracing` subscriber
//! - `WriterLogger`: appends lines to any `io::Write`, usually a file
//! - `SystemClock`: wall-clock time in UTC

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use grindstone_api::errors::{InitializationError, LoggingError};
use grindstone_api::{Clock, Logger, Timestamp};

use crate::logging::SCRIPT_TARGET;

/// Sends every line to `tracing` at INFO level. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn output(&self, line: &str) -> Result<(), LoggingError> {
        tracing::info!(target: SCRIPT_TARGET, "{}", line);
        Ok(())
    }
}

/// Appends newline-terminated lines to a writer.
///
/// Each line is written and flushed under one lock, so lines from different
/// threads never interleave mid-line.
pub struct WriterLogger<W: Write + Send> {
    writer: Mutex<W>,
}

/// `WriterLogger` over an append-mode file
pub type FileLogger = WriterLogger<File>;

impl<W: Write + Send> WriterLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> Result<W, LoggingError> {
        self.writer.into_inner().map_err(|_| LoggingError::Poisoned)
    }
}

impl FileLogger {
    /// Open `path` in append mode, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> fmt::Debug for WriterLogger<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLogger").finish_non_exhaustive()
    }
}

impl<W: Write + Send> Logger for WriterLogger<W> {
    fn output(&self, line: &str) -> Result<(), LoggingError> {
        let mut writer = self.writer.lock().map_err(|_| LoggingError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, InitializationError> {
        Ok(Utc::now())
    }
}
