//! Concurrent worker execution with ordered merge.
//!
//! Every worker runs a tight synchronous sampling loop on tokio's blocking
//! pool with its own [`RecordSampler`]. The only synchronization point is
//! the join: handles are awaited in launch order, so the merged corpus is
//! in worker-index order regardless of which worker finishes first.

use crate::error::PartitionError;
use crate::metrics::{PhaseMetrics, WorkerMetrics};
use crate::partitioner::{Phase, WorkerPlan};
use pubsub_core::AttributeDomain;
use pubsub_generator::{RecordSampler, SamplerError, SamplingRules};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Merged records of one phase.
#[derive(Debug)]
pub struct PhaseOutput<T> {
    pub records: Vec<T>,
    pub metrics: PhaseMetrics,
}

type WorkerResult<T> = Result<(Vec<T>, Duration), SamplerError>;

/// Runs the workers of a phase against a shared, read-only domain and
/// rule set.
#[derive(Debug, Clone)]
pub struct PhaseRunner {
    domain: Arc<AttributeDomain>,
    rules: Arc<SamplingRules>,
    join_timeout: Duration,
}

impl PhaseRunner {
    pub fn new(domain: Arc<AttributeDomain>, rules: Arc<SamplingRules>, join_timeout: Duration) -> Self {
        Self {
            domain,
            rules,
            join_timeout,
        }
    }

    /// Run one worker per plan, each calling `draw` `plan.count` times, and
    /// concatenate the outputs in launch order.
    ///
    /// The first failing worker (in launch order) fails the whole phase. If
    /// the workers have not all finished within the join timeout the phase
    /// fails with [`PartitionError::JoinTimeout`].
    pub async fn run<T, F>(
        &self,
        phase: Phase,
        plans: &[WorkerPlan],
        draw: F,
    ) -> Result<PhaseOutput<T>, PartitionError>
    where
        T: Send + 'static,
        F: Fn(&mut RecordSampler) -> Result<T, SamplerError> + Copy + Send + 'static,
    {
        let start = Instant::now();
        info!("Starting {} phase with {} workers", phase, plans.len());

        let handles: Vec<JoinHandle<WorkerResult<T>>> = plans
            .iter()
            .map(|plan| {
                let mut sampler = match plan.seed {
                    Some(seed) => {
                        RecordSampler::new(Arc::clone(&self.domain), Arc::clone(&self.rules), seed)
                    }
                    None => RecordSampler::from_entropy(
                        Arc::clone(&self.domain),
                        Arc::clone(&self.rules),
                    ),
                };
                let count = plan.count;
                debug!("Launching {}: {} records", plan.id, count);

                tokio::task::spawn_blocking(move || {
                    let worker_start = Instant::now();
                    let mut records = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        records.push(draw(&mut sampler)?);
                    }
                    Ok((records, worker_start.elapsed()))
                })
            })
            .collect();

        let outputs = tokio::time::timeout(self.join_timeout, join_in_order(plans, handles))
            .await
            .map_err(|_| PartitionError::JoinTimeout {
                phase,
                timeout: self.join_timeout,
            })??;

        let total: usize = outputs.iter().map(|(records, _)| records.len()).sum();
        let mut records = Vec::with_capacity(total);
        let mut workers = Vec::with_capacity(outputs.len());
        for (plan, (chunk, elapsed)) in plans.iter().zip(outputs) {
            workers.push(WorkerMetrics {
                worker_id: plan.id.clone(),
                records: chunk.len() as u64,
                duration_ms: elapsed.as_millis() as u64,
            });
            records.extend(chunk);
        }

        let metrics = PhaseMetrics {
            phase,
            total_records: records.len() as u64,
            workers,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "{} phase complete: {} records in {}ms ({:.1} records/sec)",
            phase,
            metrics.total_records,
            metrics.duration_ms,
            metrics.records_per_second()
        );

        Ok(PhaseOutput { records, metrics })
    }
}

/// Await every handle in launch order.
async fn join_in_order<T>(
    plans: &[WorkerPlan],
    handles: Vec<JoinHandle<WorkerResult<T>>>,
) -> Result<Vec<(Vec<T>, Duration)>, PartitionError> {
    let mut outputs = Vec::with_capacity(handles.len());

    for (plan, handle) in plans.iter().zip(handles) {
        let result = handle.await.map_err(|e| PartitionError::WorkerPanicked {
            worker: plan.id.clone(),
            message: e.to_string(),
        })?;
        let output = result.map_err(|source| PartitionError::WorkerFailure {
            worker: plan.id.clone(),
            source,
        })?;
        debug!("Joined {}: {} records", plan.id, output.0.len());
        outputs.push(output);
    }

    Ok(outputs)
}
