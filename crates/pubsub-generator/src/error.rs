//! Error types for record sampling.

use pubsub_core::DomainError;

/// Error type for sampler operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplerError {
    /// Field has no registered domain
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Fallback condition needed but no field is configured
    #[error("Cannot add a fallback condition: fieldFrequencies is empty")]
    EmptyVocabulary,

    /// Field domain cannot produce the value a record needs
    #[error("Field '{field}' cannot produce a value: {reason}")]
    InvalidDomain { field: String, reason: String },
}

impl From<DomainError> for SamplerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownField(field) => SamplerError::UnknownField(field),
            DomainError::KindMismatch { field, expected } => SamplerError::InvalidDomain {
                field,
                reason: format!("domain is not {expected}"),
            },
            DomainError::Duplicate(field) => SamplerError::InvalidDomain {
                field,
                reason: "field is registered twice".to_string(),
            },
        }
    }
}
