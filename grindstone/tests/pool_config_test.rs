// Integration tests for grindstone::pool configuration and errors

use std::time::Duration;

use grindstone::pool::DEFAULT_SHUTDOWN_TIMEOUT;
use grindstone::*;

#[test]
fn test_pool_config_defaults() {
    let config = WorkerPoolConfig::default();

    assert_eq!(config.threads, 1);
    assert_eq!(config.runs, 1);
    assert!(config.duration.is_none());
    assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
    assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
    assert_eq!(config.poll_interval, Duration::from_millis(10));
    assert_eq!(config.thread_name_prefix, "grindstone-worker-");
    assert!(config.validate().is_ok());
}

#[test]
fn test_pool_config_builders() {
    let config = WorkerPoolConfig::default()
        .with_threads(7)
        .with_runs(0)
        .with_duration(Duration::from_secs(3))
        .with_shutdown_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(1))
        .with_thread_name_prefix("load-");

    assert_eq!(config.threads, 7);
    assert_eq!(config.runs, 0);
    assert_eq!(config.duration, Some(Duration::from_secs(3)));
    assert_eq!(config.shutdown_timeout, Duration::from_millis(500));
    assert_eq!(config.poll_interval, Duration::from_millis(1));
    assert_eq!(config.thread_name_prefix, "load-");

    let pool = WorkerPool::new(config);
    assert_eq!(pool.config().threads, 7);
    assert!(!pool.stop_handle().is_stopped());
}

#[test]
fn test_pool_config_per_cpu() {
    let config = WorkerPoolConfig::per_cpu();

    assert_eq!(config.threads, num_cpus::get());
    assert_eq!(config.runs, 1);
    assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
}

#[test]
fn test_pool_config_validation() {
    let zero_poll = WorkerPoolConfig::default().with_poll_interval(Duration::ZERO);
    assert!(zero_poll.validate().is_err());

    let nul_prefix = WorkerPoolConfig::default().with_thread_name_prefix("a\0b");
    assert!(nul_prefix.validate().is_err());
}

#[test]
fn test_pool_error_display() {
    let init = PoolError::from(InitializationError::Resource("socket".to_string()));
    assert_eq!(
        init.to_string(),
        "Process initialization failed: Failed to acquire resource: socket"
    );

    let spawn = PoolError::ThreadSpawn {
        thread_id: WorkerThreadId::new(3),
        reason: "out of memory".to_string(),
    };
    assert_eq!(spawn.to_string(), "Failed to spawn worker thread 3: out of memory");

    let config = PoolError::InvalidConfig("bad".to_string());
    assert_eq!(config.to_string(), "Invalid configuration: bad");

    let other = PoolError::from(anyhow::anyhow!("lost track"));
    assert_eq!(other.to_string(), "Internal pool error: lost track");
}

#[test]
fn test_exit_codes_from_errors() {
    let spawn: Result<PoolReport, PoolError> = Err(PoolError::ThreadSpawn {
        thread_id: WorkerThreadId::new(0),
        reason: "denied".to_string(),
    });
    assert_eq!(ProcessExit::from_result(&spawn), ProcessExit::Error);
    assert_eq!(ProcessExit::from_result(&spawn).code(), -3);
}
