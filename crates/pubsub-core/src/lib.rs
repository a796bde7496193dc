//! Core types for the pubsub-gen corpus generator.
//!
//! This crate provides the foundational types shared by the generator,
//! partitioner and verifier:
//!
//! - [`AttributeDomain`] - Registry of every field's value space and operators
//! - [`Publication`] / [`Subscription`] - The two record kinds
//! - [`format`] - The one-line-per-record text format, both directions
//! - [`GeneratorConfig`] - Run configuration loaded from JSON or YAML
//!
//! # Architecture
//!
//! ```text
//! pubsub-core (this crate)
//!    │
//!    ├─── pubsub-generator  (samples records from the domain + config)
//!    │
//!    ├─── pubsub-partition  (splits work across workers, merges in order)
//!    │
//!    └─── pubsub-verify     (tallies a corpus against the config targets)
//! ```
//!
//! # Example
//!
//! ```rust
//! use pubsub_core::{Condition, Operator, Subscription, Value};
//!
//! let mut builder = Subscription::builder();
//! builder.insert(Condition::new("temp", Operator::Lt, Value::Int(10)));
//! let sub = builder.build().unwrap();
//!
//! assert_eq!(sub.to_string(), "{(temp,<,10)}");
//! ```

pub mod config;
pub mod domain;
pub mod format;
pub mod record;

// Re-exports for convenience
pub use config::{ConfigError, FieldFrequencies, GeneratorConfig, OrderedMap};
pub use domain::{AttributeDomain, DomainError, FieldDomain};
pub use format::{parse_publication, parse_subscription, FormatError, ParsedCondition};
pub use record::{Condition, Operator, Publication, Subscription, SubscriptionBuilder, Value};
