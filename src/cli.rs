//! CLI argument definitions for pubsub-gen.

use crate::config::duration::parse_duration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Synthetic publish/subscribe workload generator.
#[derive(Parser)]
#[command(name = "pubsub-gen")]
#[command(about = "Generate and verify synthetic publication and subscription corpora")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate both corpora, write them to disk and report their statistics
    Generate(GenerateArgs),

    /// Verify corpora previously written to disk
    Verify(VerifyArgs),
}

/// Output format for the verification report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Number of publications to generate
    #[arg(long, env = "PUBSUB_NUM_PUBLICATIONS")]
    pub num_publications: Option<u64>,

    /// Number of subscriptions to generate
    #[arg(long, env = "PUBSUB_NUM_SUBSCRIPTIONS")]
    pub num_subscriptions: Option<u64>,

    /// Number of workers per phase
    #[arg(long, short = 't', env = "PUBSUB_NUM_THREADS")]
    pub num_threads: Option<usize>,

    /// Percentage of city conditions using `=`
    #[arg(long, env = "PUBSUB_EQUALITY_RATIO")]
    pub equality_ratio: Option<u32>,

    /// Base random seed; workers derive their own seeds from it
    #[arg(long, env = "PUBSUB_SEED")]
    pub seed: Option<u64>,

    /// Bounded wait for the workers of a phase (e.g., "90s", "2m")
    #[arg(long, value_parser = parse_duration)]
    pub join_timeout: Option<Duration>,
}

/// Arguments for the generate command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Configuration file (JSON or YAML); defaults to ./config.json when present
    #[arg(long, short = 'c', env = "PUBSUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the corpora are written to
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// File name of the publication corpus
    #[arg(long, default_value = "publications.txt")]
    pub publications_file: String,

    /// File name of the subscription corpus
    #[arg(long, default_value = "subscriptions.txt")]
    pub subscriptions_file: String,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Output format of the report
    #[arg(long, short = 'f', default_value = "table")]
    pub format: OutputFormat,

    /// Skip verification after generation
    #[arg(long)]
    pub skip_verify: bool,
}

/// Arguments for the verify command.
#[derive(Args, Clone, Debug)]
pub struct VerifyArgs {
    /// Subscription corpus to verify
    #[arg(long, short = 's')]
    pub subscriptions: PathBuf,

    /// Publication corpus to check against the attribute domains
    #[arg(long, short = 'p')]
    pub publications: Option<PathBuf>,

    /// Configuration the corpora were generated with
    #[arg(long, short = 'c', env = "PUBSUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum deviation from each target, in percentage points
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Output format of the report
    #[arg(long, short = 'f', default_value = "table")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "pubsub-gen",
            "generate",
            "--num-subscriptions",
            "10000",
            "-t",
            "8",
            "--join-timeout",
            "2m",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.overrides.num_subscriptions, Some(10000));
                assert_eq!(args.overrides.num_threads, Some(8));
                assert_eq!(args.overrides.join_timeout, Some(Duration::from_secs(120)));
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.publications_file, "publications.txt");
                assert!(!args.skip_verify);
            }
            _ => panic!("Expected generate command"),
        }
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from([
            "pubsub-gen",
            "verify",
            "--subscriptions",
            "out/subscriptions.txt",
            "--tolerance",
            "2.5",
        ])
        .unwrap();

        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(args.subscriptions, PathBuf::from("out/subscriptions.txt"));
                assert_eq!(args.tolerance, Some(2.5));
                assert!(args.publications.is_none());
                assert_eq!(args.format, OutputFormat::Table);
            }
            _ => panic!("Expected verify command"),
        }
    }

    #[test]
    fn test_invalid_join_timeout() {
        assert!(Cli::try_parse_from(["pubsub-gen", "generate", "--join-timeout", "soon"]).is_err());
    }
}
