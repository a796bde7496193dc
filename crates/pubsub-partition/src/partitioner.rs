//! Work partitioning for parallel generation.
//!
//! Splits a record count across workers. Every worker but the last gets
//! `total / workers` records and the last one takes the rest, so the chunks
//! always sum to `total` and the last worker carries at most
//! `workers - 1` extra records. That imbalance is accepted in exchange for
//! not needing a remainder-distribution pass.

use crate::error::PartitionError;
use serde::{Deserialize, Serialize};

/// Which corpus a worker contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Publications,
    Subscriptions,
}

impl Phase {
    /// Offset mixed into worker seeds so the two phases never share a
    /// random sequence.
    fn seed_salt(&self) -> u64 {
        match self {
            Phase::Publications => 0,
            Phase::Subscriptions => 0xD1B5_4A32_D192_ED03,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Publications => write!(f, "publications"),
            Phase::Subscriptions => write!(f, "subscriptions"),
        }
    }
}

/// Assignment for a single worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPlan {
    /// Unique worker identifier (e.g., "subscriptions-1")
    pub id: String,
    /// Launch index; merged output follows this order
    pub index: usize,
    /// Number of records this worker generates
    pub count: u64,
    /// Seed for this worker's RNG; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

/// Split `total` records into `workers` chunks.
pub fn partition_counts(total: u64, workers: usize) -> Result<Vec<u64>, PartitionError> {
    if workers == 0 {
        return Err(PartitionError::InvalidWorkerCount);
    }

    let base = total / workers as u64;
    let last = total - base * (workers as u64 - 1);

    let mut counts = vec![base; workers - 1];
    counts.push(last);
    Ok(counts)
}

/// Derive the RNG seed for worker `index` of `phase`.
pub fn worker_seed(base_seed: u64, phase: Phase, index: usize) -> u64 {
    base_seed
        .wrapping_add(phase.seed_salt())
        .wrapping_add((index as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

/// Plan the workers of one phase.
pub fn plan_workers(
    phase: Phase,
    total: u64,
    workers: usize,
    base_seed: Option<u64>,
) -> Result<Vec<WorkerPlan>, PartitionError> {
    let counts = partition_counts(total, workers)?;

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| WorkerPlan {
            id: format!("{phase}-{}", index + 1),
            index,
            count,
            seed: base_seed.map(|seed| worker_seed(seed, phase, index)),
        })
        .collect())
}

/// Describe the partitioning plan for logging.
pub fn describe_partitioning(plans: &[WorkerPlan]) -> String {
    let mut lines = Vec::new();
    lines.push("Work distribution:".to_string());

    for plan in plans {
        let seed_str = match plan.seed {
            Some(seed) => seed.to_string(),
            None => "entropy".to_string(),
        };
        lines.push(format!(
            "  {}: {} records (seed={})",
            plan.id, plan.count, seed_str
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even_split() {
        assert_eq!(partition_counts(100, 4).unwrap(), vec![25, 25, 25, 25]);
    }

    #[test]
    fn test_partition_remainder_goes_to_last() {
        assert_eq!(partition_counts(10, 4).unwrap(), vec![2, 2, 2, 4]);
        assert_eq!(partition_counts(7, 1).unwrap(), vec![7]);
    }

    #[test]
    fn test_partition_more_workers_than_records() {
        assert_eq!(partition_counts(3, 5).unwrap(), vec![0, 0, 0, 0, 3]);
        assert_eq!(partition_counts(0, 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_partition_sums_to_total() {
        for total in [0u64, 1, 2, 9, 10, 99, 1000, 12_345] {
            for workers in 1..=17 {
                let counts = partition_counts(total, workers).unwrap();
                assert_eq!(counts.len(), workers);
                assert_eq!(counts.iter().sum::<u64>(), total);

                // Imbalance is bounded and concentrated in the last chunk
                let base = counts[0];
                assert!(counts[..workers - 1].iter().all(|&c| c == base));
                assert!(counts[workers - 1] - base < workers as u64);
            }
        }
    }

    #[test]
    fn test_partition_zero_workers() {
        assert!(matches!(
            partition_counts(10, 0),
            Err(PartitionError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_plan_workers_ids_and_seeds() {
        let plans = plan_workers(Phase::Subscriptions, 10, 3, Some(42)).unwrap();

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].id, "subscriptions-1");
        assert_eq!(plans[2].id, "subscriptions-3");
        assert_eq!(plans[2].count, 4);

        let seeds: std::collections::HashSet<_> = plans.iter().map(|p| p.seed).collect();
        assert_eq!(seeds.len(), 3);
        assert_eq!(plans[1].seed, Some(worker_seed(42, Phase::Subscriptions, 1)));
    }

    #[test]
    fn test_phases_use_distinct_seeds() {
        assert_ne!(
            worker_seed(42, Phase::Publications, 0),
            worker_seed(42, Phase::Subscriptions, 0)
        );
    }

    #[test]
    fn test_plan_workers_without_seed() {
        let plans = plan_workers(Phase::Publications, 5, 2, None).unwrap();
        assert!(plans.iter().all(|p| p.seed.is_none()));
    }

    #[test]
    fn test_describe_partitioning() {
        let plans = plan_workers(Phase::Publications, 10, 2, Some(7)).unwrap();

        let description = describe_partitioning(&plans);
        assert!(description.contains("publications-1: 5 records"));
        assert!(description.contains("publications-2"));
        assert!(description.contains("seed=7"));

        let plans = plan_workers(Phase::Publications, 10, 2, None).unwrap();
        assert!(describe_partitioning(&plans).contains("seed=entropy"));
    }
}
