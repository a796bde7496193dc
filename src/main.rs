//! Command-line interface for pubsub-gen
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Defaults: 10 publications, 10 subscriptions, 4 workers
//! pubsub-gen generate
//!
//! # Explicit configuration and output location
//! pubsub-gen generate --config config.yaml --output-dir out --format json
//!
//! # Override the configuration from the command line
//! pubsub-gen generate --num-subscriptions 10000 --equality-ratio 70 --join-timeout 2m
//! ```
//!
//! ## Verify
//! ```bash
//! pubsub-gen verify \
//!   --subscriptions out/subscriptions.txt \
//!   --publications out/publications.txt \
//!   --config config.yaml \
//!   --tolerance 2
//! ```

use clap::Parser;
use pubsub_gen::corpus::{run_generate, run_verify};
use pubsub_gen::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Verify(args) => run_verify(args).await,
    }
}
