// Logging System for Grindstone
//
// This module sets up the process-wide `tracing` subscriber used by the
// worker pool and by the `TracingLogger` sink that script runners write to.
//
// # Usage Examples
//
// ## Basic Initialization
//
// ```rust
// use grindstone::logging;
//
// // Initialize with default settings (INFO level, console output)
// logging::init_default();
//
// // Or initialize with custom settings
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     json_format: false,
//     ..Default::default()
// };
// logging::init(config);
// ```
//
// ## File Logging
//
// ```rust
// use grindstone::logging;
//
// let config = logging::LogConfig::default();
// logging::init_with_file(config, "/var/log/grindstone/worker.log")?;
// ```
//
// ## Worker Spans
//
// Each worker thread runs inside a `worker` span, so every line a runner
// emits is tagged with the thread id:
//
// ```rust
// let span = grindstone::worker_span!(thread_id);
// let _guard = span.enter();
// grindstone::log_worker!(thread_id, "started");
// ```

use std::fs::OpenOptions;
use std::io;
use std::sync::Once;

use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target used for lines written by script runners through `TracingLogger`
pub const SCRIPT_TARGET: &str = "grindstone::script";

/// Configuration for the Grindstone logging system
///
/// # Examples
///
/// ```rust
/// use grindstone::logging::LogConfig;
/// use tracing::Level;
///
/// let custom_config = LogConfig {
///     level: Level::DEBUG,
///     json_format: true,
///     show_file_line: false,
///     show_thread_info: true,
///     show_time: true,
///     target_filters: Some("grindstone=debug,grindstone::pool=trace".to_string()),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Whether to use JSON format for logs
    pub json_format: bool,
    /// Whether to include file and line information
    pub show_file_line: bool,
    /// Whether to include thread name/id
    pub show_thread_info: bool,
    /// Whether to include timestamps
    pub show_time: bool,
    /// Target filter expressions (format: "target=level,target2=level2,...")
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_file_line: true,
            show_thread_info: true,
            show_time: true,
            target_filters: None,
        }
    }
}

// Initialization guard to ensure we only initialize once
static INIT: Once = Once::new();

fn env_filter(config: &LogConfig) -> EnvFilter {
    let mut env_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    if let Some(filters) = &config.target_filters {
        for filter in filters.split(',') {
            if let Ok(directive) = filter.parse() {
                env_filter = env_filter.add_directive(directive);
            }
        }
    }

    env_filter
}

/// Initialize the logging system with the given configuration
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(env_filter(&config));

        let subscriber: Box<dyn Subscriber + Send + Sync> = if config.json_format {
            Box::new(registry.with(fmt::layer().json().flatten_event(true)))
        } else if config.show_time {
            Box::new(
                registry.with(
                    fmt::layer()
                        .with_ansi(atty::is(atty::Stream::Stdout))
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                        .with_thread_names(config.show_thread_info)
                        .with_thread_ids(config.show_thread_info),
                ),
            )
        } else {
            Box::new(
                registry.with(
                    fmt::layer()
                        .without_time()
                        .with_ansi(atty::is(atty::Stream::Stdout))
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                        .with_thread_names(config.show_thread_info)
                        .with_thread_ids(config.show_thread_info),
                ),
            )
        };

        set_global_subscriber(subscriber);
    });
}

fn set_global_subscriber<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting global tracing subscriber: {}", err);
    }
}

/// Open a log file in append mode, creating it if it doesn't exist
pub fn file_writer(path: &str) -> io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize logging with both console and file output
///
/// The file is opened up front so an unwritable path is reported to the
/// caller instead of being discovered on the first log line.
pub fn init_with_file(config: LogConfig, log_file: &str) -> io::Result<()> {
    let file = file_writer(log_file)?;

    INIT.call_once(move || {
        let console_layer = fmt::layer()
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        let file_layer = fmt::layer()
            .with_ansi(false) // No ANSI colors in files
            .with_writer(std::sync::Mutex::new(file))
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_thread_ids(true);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter(&config))
            .with(console_layer)
            .with(file_layer);

        set_global_subscriber(subscriber);
    });

    Ok(())
}

/// INFO level, human-readable console output
pub fn init_default() {
    init(LogConfig::default());
}

/// DEBUG level for the crate, TRACE for the worker pool
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        json_format: false,
        show_file_line: true,
        show_thread_info: true,
        show_time: true,
        target_filters: Some("grindstone=debug,grindstone::pool=trace".to_string()),
    });
}

/// JSON output without file/line information
pub fn init_production() {
    init(LogConfig {
        level: Level::INFO,
        json_format: true,
        show_file_line: false,
        show_thread_info: true,
        show_time: true,
        target_filters: None,
    });
}

/// Only warnings and errors, to keep test output clean
///
/// ```rust
/// #[test]
/// fn my_test() {
///     grindstone::logging::init_test();
///     // Your test code...
/// }
/// ```
pub fn init_test() {
    init(LogConfig {
        level: Level::WARN,
        json_format: false,
        show_file_line: true,
        show_thread_info: false,
        show_time: false,
        target_filters: None,
    });
}

/// Create the span a worker thread runs inside
///
/// ```rust
/// let span = grindstone::worker_span!(3usize);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! worker_span {
    ($thread_id:expr) => {
        tracing::info_span!("worker", thread_id = %$thread_id)
    };
    ($thread_id:expr, $($fields:tt)*) => {
        tracing::info_span!("worker", thread_id = %$thread_id, $($fields)*)
    };
}

/// Log worker lifecycle events
///
/// ```rust
/// grindstone::log_worker!(3usize, "finished", runs = 10u64);
/// ```
#[macro_export]
macro_rules! log_worker {
    ($thread_id:expr, $event:expr) => {
        tracing::debug!(thread_id = %$thread_id, event = $event);
    };
    ($thread_id:expr, $event:expr, $($fields:tt)*) => {
        tracing::debug!(thread_id = %$thread_id, event = $event, $($fields)*);
    };
}

/// Log error events
///
/// ```rust
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
/// grindstone::log_error!(error, component = "pool");
/// ```
#[macro_export]
macro_rules! log_error {
    ($error:expr) => {
        tracing::error!(error = %$error);
    };
    ($error:expr, $($fields:tt)*) => {
        tracing::error!(error = %$error, $($fields)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(config.show_time);
        assert!(config.target_filters.is_none());
    }

    #[test]
    fn test_env_filter_applies_target_filters() {
        let config = LogConfig {
            target_filters: Some(format!("{}=debug,grindstone::pool=trace", SCRIPT_TARGET)),
            ..Default::default()
        };
        let filter = env_filter(&config).to_string();
        assert!(filter.contains("grindstone::pool=trace"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init_test();
        init_test();
        init_default();
        tracing::warn!("logging initialised");
    }
}
