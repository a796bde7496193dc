//! Statistical verification of generated corpora.
//!
//! Tallies how often each configured field appears in a subscription
//! corpus, compares it to `round(subscriptions * frequency / 100)`, and
//! measures the share of city conditions that use `=`. Publications can be
//! checked for completeness and in-domain values.
//!
//! # Example
//!
//! ```rust
//! use pubsub_core::GeneratorConfig;
//! use pubsub_verify::{format_table, CorpusVerifier};
//!
//! let verifier = CorpusVerifier::from_config(&GeneratorConfig::default()).unwrap();
//! let report = verifier
//!     .verify_subscription_lines(["{(city,=,Cluj);(temp,<,10)}"])
//!     .unwrap();
//!
//! assert_eq!(report.subscriptions, 1);
//! println!("{}", format_table(&report));
//! ```

pub mod error;
pub mod report;
pub mod verifier;

pub use error::VerifyError;
pub use report::{
    format_json, format_table, format_violations, EqualityRatio, FieldStat, PublicationCheck,
    VerificationReport,
};
pub use verifier::CorpusVerifier;
