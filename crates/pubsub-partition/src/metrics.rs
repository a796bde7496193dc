//! Metrics types for generation phases.

use crate::partitioner::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of a single worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerMetrics {
    /// Worker identifier
    pub worker_id: String,
    /// Records generated
    pub records: u64,
    /// Time spent sampling, in milliseconds
    pub duration_ms: u64,
}

/// Metrics for one generation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub phase: Phase,
    /// Total records after the merge
    pub total_records: u64,
    /// Per-worker breakdown, in launch order
    pub workers: Vec<WorkerMetrics>,
    /// Wall clock duration of the phase in milliseconds
    pub duration_ms: u64,
}

impl PhaseMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.duration_ms > 0 {
            self.total_records as f64 / (self.duration_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }
}

/// Metrics for a whole run (both phases).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub publications: PhaseMetrics,
    pub subscriptions: PhaseMetrics,
}

impl GenerationMetrics {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Elapsed generation time in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}
