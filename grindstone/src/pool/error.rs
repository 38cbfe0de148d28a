use grindstone_api::errors::InitializationError;
use grindstone_api::WorkerThreadId;
use thiserror::Error;

/// Errors that stop a worker pool from running.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Process initialization failed: {0}")]
    Initialization(#[from] InitializationError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to spawn worker thread {thread_id}: {reason}")]
    ThreadSpawn {
        thread_id: WorkerThreadId,
        reason: String,
    },
    #[error("Internal pool error: {0}")]
    Other(#[from] anyhow::Error),
}
