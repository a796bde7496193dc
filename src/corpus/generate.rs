//! Generate command handler.

use super::writer::{prepare_corpus, WriteMetrics};
use crate::cli::{GenerateArgs, OutputFormat};
use crate::config::{apply_overrides, load_config};
use anyhow::Context;
use pubsub_core::GeneratorConfig;
use pubsub_partition::{generate_corpus, GenerationMetrics};
use pubsub_verify::{format_table, CorpusVerifier, VerificationReport};
use serde::Serialize;
use std::path::PathBuf;

/// Where the two corpora of a run are written.
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    pub publications: PathBuf,
    pub subscriptions: PathBuf,
}

impl CorpusPaths {
    pub fn from_args(args: &GenerateArgs) -> Self {
        Self {
            publications: args.output_dir.join(&args.publications_file),
            subscriptions: args.output_dir.join(&args.subscriptions_file),
        }
    }
}

/// Everything a generate run produced.
#[derive(Debug, Serialize)]
pub struct GenerateOutcome {
    pub publications_path: PathBuf,
    pub subscriptions_path: PathBuf,
    pub metrics: GenerationMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<VerificationReport>,
}

/// Generate both corpora, write them to `paths` and optionally verify the
/// in-memory subscriptions against the configuration.
///
/// Nothing is written unless both phases complete and both corpora are
/// staged next to their targets.
pub async fn generate_to_files(
    config: &GeneratorConfig,
    paths: &CorpusPaths,
    verify: bool,
) -> anyhow::Result<GenerateOutcome> {
    let corpus = generate_corpus(config)
        .await
        .context("Corpus generation failed")?;

    // Both files are staged before either replaces its target
    let staged_publications = prepare_corpus(&paths.publications, &corpus.publications)?;
    let staged_subscriptions = prepare_corpus(&paths.subscriptions, &corpus.subscriptions)?;
    let publications: WriteMetrics = staged_publications.persist()?;
    let subscriptions: WriteMetrics = staged_subscriptions.persist()?;
    tracing::debug!(
        "Write time: publications {:?}, subscriptions {:?}",
        publications.write_duration,
        subscriptions.write_duration
    );

    let report = if verify {
        let verifier = CorpusVerifier::from_config(config)?;
        let mut report = verifier.verify_subscriptions(&corpus.subscriptions);
        report.publications = Some(verifier.check_publications(&corpus.publications));
        Some(report)
    } else {
        None
    };

    Ok(GenerateOutcome {
        publications_path: paths.publications.clone(),
        subscriptions_path: paths.subscriptions.clone(),
        metrics: corpus.metrics,
        report,
    })
}

/// Run the generate command.
pub async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides);

    tracing::info!("Publications: {}", config.num_publications);
    tracing::info!("Subscriptions: {}", config.num_subscriptions);
    tracing::info!("Workers: {}", config.num_threads);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output_dir))?;

    let paths = CorpusPaths::from_args(&args);
    let outcome = generate_to_files(&config, &paths, !args.skip_verify).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Table => print!("{}", format_summary(&outcome)),
    }
    Ok(())
}

/// Console summary of a generate run.
pub fn format_summary(outcome: &GenerateOutcome) -> String {
    let mut output = String::new();
    let metrics = &outcome.metrics;

    output.push_str(&format!("Time taken: {} ms\n", metrics.duration_ms()));
    output.push_str(&format!(
        "Publications: {} ({:.0} records/sec) -> {}\n",
        metrics.publications.total_records,
        metrics.publications.records_per_second(),
        outcome.publications_path.display()
    ));
    output.push_str(&format!(
        "Subscriptions: {} ({:.0} records/sec) -> {}\n",
        metrics.subscriptions.total_records,
        metrics.subscriptions.records_per_second(),
        outcome.subscriptions_path.display()
    ));

    if let Some(report) = &outcome.report {
        output.push('\n');
        output.push_str(&format_table(report));
    }
    output
}
