//! Parallel batch generation for pubsub-gen.
//!
//! This crate splits a requested record count across a fixed number of
//! workers, runs them concurrently, and merges their output in worker
//! launch order.
//!
//! ## Architecture
//!
//! ```text
//!                    GeneratorConfig
//!                          │
//!                          ▼
//!                 ┌─────────────────┐
//!                 │  plan_workers   │  base = K / W, last takes the rest
//!                 └────────┬────────┘
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!    ┌──────────┐    ┌──────────┐    ┌──────────┐
//!    │ Worker 1 │    │ Worker 2 │    │ Worker N │   own RecordSampler + RNG
//!    └──────────┘    └──────────┘    └──────────┘
//!          │               │               │
//!          └───────────────┼───────────────┘
//!                          ▼  join in launch order (bounded wait)
//!                   merged corpus
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), pubsub_partition::PartitionError> {
//! use pubsub_core::GeneratorConfig;
//!
//! let config = GeneratorConfig::default();
//! let corpus = pubsub_partition::generate_corpus(&config).await?;
//! println!("{} subscriptions", corpus.subscriptions.len());
//! # Ok(())
//! # }
//! ```

pub mod corpus;
pub mod error;
pub mod metrics;
pub mod partitioner;
pub mod worker;

pub use corpus::*;
pub use error::*;
pub use metrics::*;
pub use partitioner::*;
pub use worker::*;
