//! pubsub-gen library
//!
//! Generates synthetic publish/subscribe workloads: a corpus of
//! weather-station publications and a corpus of subscriptions whose field
//! frequencies and city equality ratio follow the configuration.
//!
//! # Workspace crates
//!
//! - `pubsub_core` - attribute domains, record types, text format, configuration
//! - `pubsub_generator` - the weighted record sampler
//! - `pubsub_partition` - parallel generation with ordered merge
//! - `pubsub_verify` - statistical verification and reporting
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate with the defaults (or ./config.json when present)
//! pubsub-gen generate --output-dir out
//!
//! # Larger run, reproducible
//! pubsub-gen generate --num-subscriptions 10000 --num-threads 8 --seed 42
//!
//! # Verify a corpus written earlier
//! pubsub-gen verify --subscriptions out/subscriptions.txt --tolerance 2
//! ```

pub mod cli;
pub mod config;
pub mod corpus;

pub use cli::{Cli, Commands, ConfigOverrides, GenerateArgs, OutputFormat, VerifyArgs};
pub use config::{apply_overrides, load_config};
