//! Error types for partitioned generation.

use crate::partitioner::Phase;
use pubsub_core::ConfigError;
use pubsub_generator::SamplerError;
use std::time::Duration;

/// Errors that abort a generation run. No partial corpus is produced when
/// any of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// Worker count of zero
    #[error("At least one worker is required")]
    InvalidWorkerCount,

    /// A worker's sampler returned an error
    #[error("Worker {worker} failed: {source}")]
    WorkerFailure {
        worker: String,
        #[source]
        source: SamplerError,
    },

    /// A worker panicked or was cancelled
    #[error("Worker {worker} did not complete: {message}")]
    WorkerPanicked { worker: String, message: String },

    /// Not every worker finished within the join timeout
    #[error("{phase} workers did not finish within {timeout:?}")]
    JoinTimeout { phase: Phase, timeout: Duration },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
