//! Weighted record sampler for the pubsub-gen corpus generator.
//!
//! This crate provides the [`RecordSampler`], which draws publications
//! (every field uniform over its domain) and subscriptions (each field
//! included with its configured frequency, city using `=` with the
//! configured equality ratio). Each sampler owns its RNG, so concurrent
//! workers never share a random source.
//!
//! # Architecture
//!
//! ```text
//! GeneratorConfig ──► SamplingRules ─┐
//!                                    ▼
//! AttributeDomain ──────────► ┌──────────────────┐
//!                             │  RecordSampler   │
//!                             │                  │
//!                             │  - domain (Arc)  │
//!                             │  - rules  (Arc)  │
//!                             │  - rng (StdRng)  │
//!                             └────────┬─────────┘
//!                                      │
//!                                      ▼
//!                         Publication / Subscription
//! ```
//!
//! # Example
//!
//! ```rust
//! use pubsub_core::GeneratorConfig;
//! use pubsub_generator::{RecordSampler, SamplingRules};
//! use std::sync::Arc;
//!
//! let config = GeneratorConfig::default();
//! let domain = config.validate().unwrap();
//! let rules = SamplingRules::from_config(&config);
//!
//! let mut sampler = RecordSampler::new(Arc::new(domain), Arc::new(rules), 42);
//! let sub = sampler.next_subscription().unwrap();
//! println!("{sub}");
//! ```

pub mod error;
pub mod generators;
pub mod sampler;

// Re-exports for convenience
pub use error::SamplerError;
pub use sampler::{RecordSampler, SamplingRules};
