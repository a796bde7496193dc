//! Two-phase corpus generation.

use crate::error::PartitionError;
use crate::metrics::GenerationMetrics;
use crate::partitioner::{describe_partitioning, plan_workers, Phase};
use crate::worker::PhaseRunner;
use chrono::Utc;
use pubsub_core::{GeneratorConfig, Publication, Subscription};
use pubsub_generator::{RecordSampler, SamplingRules};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Both corpora of a run, each in worker-launch order.
#[derive(Debug)]
pub struct GeneratedCorpus {
    pub publications: Vec<Publication>,
    pub subscriptions: Vec<Subscription>,
    pub metrics: GenerationMetrics,
}

/// Validate `config` and generate both corpora.
///
/// The publication and subscription phases run concurrently on
/// independent workers. Either phase failing fails the run; no partial
/// corpus is ever returned.
pub async fn generate_corpus(config: &GeneratorConfig) -> Result<GeneratedCorpus, PartitionError> {
    let domain = Arc::new(config.validate()?);
    let rules = Arc::new(SamplingRules::from_config(config));
    let runner = PhaseRunner::new(domain, rules, Duration::from_secs(config.join_timeout_secs));

    let pub_plans = plan_workers(
        Phase::Publications,
        config.num_publications,
        config.num_threads,
        config.seed,
    )?;
    let sub_plans = plan_workers(
        Phase::Subscriptions,
        config.num_subscriptions,
        config.num_threads,
        config.seed,
    )?;
    debug!("{}", describe_partitioning(&pub_plans));
    debug!("{}", describe_partitioning(&sub_plans));

    info!(
        "Generating {} publications and {} subscriptions on {} workers",
        config.num_publications, config.num_subscriptions, config.num_threads
    );

    let started_at = Utc::now();
    let (publications, subscriptions) = tokio::try_join!(
        runner.run(Phase::Publications, &pub_plans, RecordSampler::next_publication),
        runner.run(Phase::Subscriptions, &sub_plans, RecordSampler::next_subscription),
    )?;
    let completed_at = Utc::now();

    Ok(GeneratedCorpus {
        publications: publications.records,
        subscriptions: subscriptions.records,
        metrics: GenerationMetrics {
            started_at,
            completed_at,
            publications: publications.metrics,
            subscriptions: subscriptions.metrics,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsub_core::ConfigError;

    #[tokio::test]
    async fn test_generate_corpus_sizes() {
        let config = GeneratorConfig {
            num_publications: 101,
            num_subscriptions: 57,
            num_threads: 3,
            seed: Some(42),
            ..Default::default()
        };

        let corpus = generate_corpus(&config).await.unwrap();
        assert_eq!(corpus.publications.len(), 101);
        assert_eq!(corpus.subscriptions.len(), 57);
        assert_eq!(corpus.metrics.publications.total_records, 101);
        assert_eq!(corpus.metrics.subscriptions.workers.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_corpus_seeded_runs_match() {
        let config = GeneratorConfig {
            num_publications: 40,
            num_subscriptions: 40,
            num_threads: 4,
            seed: Some(7),
            ..Default::default()
        };

        let first = generate_corpus(&config).await.unwrap();
        let second = generate_corpus(&config).await.unwrap();
        assert_eq!(first.publications, second.publications);
        assert_eq!(first.subscriptions, second.subscriptions);
    }

    #[tokio::test]
    async fn test_generate_corpus_empty() {
        let config = GeneratorConfig {
            num_publications: 0,
            num_subscriptions: 0,
            ..Default::default()
        };

        let corpus = generate_corpus(&config).await.unwrap();
        assert!(corpus.publications.is_empty());
        assert!(corpus.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn test_generate_corpus_rejects_invalid_config() {
        let config = GeneratorConfig::from_json(r#"{"fieldFrequencies": {"pressure": 5}}"#).unwrap();

        assert!(matches!(
            generate_corpus(&config).await,
            Err(PartitionError::Config(ConfigError::UnknownField(_)))
        ));
    }
}
