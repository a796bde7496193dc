//! Verify command handler.

use crate::cli::{OutputFormat, VerifyArgs};
use crate::config::load_config;
use anyhow::Context;
use pubsub_verify::{format_json, format_table, format_violations, CorpusVerifier, VerificationReport};

/// Verify the corpora named in `args` against the configuration.
pub fn verify_files(args: &VerifyArgs) -> anyhow::Result<VerificationReport> {
    let config = load_config(args.config.as_deref())?;
    let verifier = CorpusVerifier::from_config(&config)?;

    let mut report = verifier
        .verify_subscription_file(&args.subscriptions)
        .with_context(|| format!("Failed to verify {:?}", args.subscriptions))?;

    if let Some(path) = &args.publications {
        let check = verifier
            .check_publication_file(path)
            .with_context(|| format!("Failed to check {path:?}"))?;
        report.publications = Some(check);
    }

    Ok(report)
}

/// Run the verify command.
pub async fn run_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let report = verify_files(&args)?;

    match args.format {
        OutputFormat::Json => println!("{}", format_json(&report)?),
        OutputFormat::Table => print!("{}", format_table(&report)),
    }

    if let Some(tolerance) = args.tolerance {
        let violations = report.violations(tolerance);
        if !violations.is_empty() {
            eprintln!("{}", format_violations(&violations));
            anyhow::bail!(
                "Verification failed: {} check(s) outside {tolerance} percentage points",
                violations.len()
            );
        }
        tracing::info!("All checks within {tolerance} percentage points");
    }

    Ok(())
}
