//! Record sampler producing publications and subscriptions.

use crate::error::SamplerError;
use crate::generators::{generate_value, operator::choose_operator};
use chrono::NaiveDate;
use pubsub_core::domain::{CITY, DATE, DIRECTION, RAIN, STATION_ID, TEMP, WIND};
use pubsub_core::{
    AttributeDomain, Condition, GeneratorConfig, Publication, Subscription, Value,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Subscription sampling parameters derived from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRules {
    /// Fields in evaluation order, each with its inclusion percentage
    pub candidates: Vec<(String, u32)>,
    /// Percentage of city conditions using `=`
    pub equality_ratio: u32,
    /// Fields the fallback condition is drawn from (the configured
    /// `fieldFrequencies` keys, not every registered field)
    pub vocabulary: Vec<String>,
}

impl SamplingRules {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let candidates = config
            .subscription_fields()
            .into_iter()
            .map(|field| (field.to_string(), config.frequency(field)))
            .collect();
        let vocabulary = config
            .field_frequencies
            .keys()
            .map(|field| field.to_string())
            .collect();

        Self {
            candidates,
            equality_ratio: config.equality_ratio,
            vocabulary,
        }
    }
}

/// Sampler that draws one record at a time from its own random source.
///
/// The domain and rules are shared read-only; the RNG is owned, so every
/// worker gets an independent sampler.
pub struct RecordSampler {
    /// Field registry
    domain: Arc<AttributeDomain>,
    /// Subscription inclusion and operator rules
    rules: Arc<SamplingRules>,
    /// Random source owned by this sampler
    rng: StdRng,
}

impl RecordSampler {
    /// Create a new sampler seeded with `seed`.
    pub fn new(domain: Arc<AttributeDomain>, rules: Arc<SamplingRules>, seed: u64) -> Self {
        Self::from_rng(domain, rules, StdRng::seed_from_u64(seed))
    }

    /// Create a new sampler seeded from OS entropy.
    pub fn from_entropy(domain: Arc<AttributeDomain>, rules: Arc<SamplingRules>) -> Self {
        Self::from_rng(domain, rules, StdRng::from_entropy())
    }

    pub fn from_rng(domain: Arc<AttributeDomain>, rules: Arc<SamplingRules>, rng: StdRng) -> Self {
        Self { domain, rules, rng }
    }

    /// Get a reference to the field registry.
    pub fn domain(&self) -> &AttributeDomain {
        &self.domain
    }

    /// Get a reference to the sampling rules.
    pub fn rules(&self) -> &SamplingRules {
        &self.rules
    }

    /// Draw a publication with every field sampled uniformly and
    /// independently from its domain.
    pub fn next_publication(&mut self) -> Result<Publication, SamplerError> {
        Ok(Publication {
            station_id: self.int_value(STATION_ID)?,
            city: self.text_value(CITY)?,
            temp: self.int_value(TEMP)?,
            rain: self.float_value(RAIN)?,
            wind: self.int_value(WIND)?,
            direction: self.text_value(DIRECTION)?,
            date: self.date_value(DATE)?,
        })
    }

    /// Draw a subscription.
    ///
    /// Each candidate field is included independently with its configured
    /// probability. When no field is included, exactly one fallback
    /// condition is added on a field drawn uniformly from the configured
    /// vocabulary.
    pub fn next_subscription(&mut self) -> Result<Subscription, SamplerError> {
        let rules = Arc::clone(&self.rules);
        let mut builder = Subscription::builder();

        for (field, pct) in &rules.candidates {
            if self.rng.gen_range(0..100) < *pct {
                let condition = self.condition(field)?;
                builder.insert(condition);
            }
        }

        if builder.is_empty() {
            if rules.vocabulary.is_empty() {
                return Err(SamplerError::EmptyVocabulary);
            }
            let idx = self.rng.gen_range(0..rules.vocabulary.len());
            let condition = self.condition(&rules.vocabulary[idx])?;
            builder.insert(condition);
        }

        builder.build().ok_or(SamplerError::EmptyVocabulary)
    }

    /// Build one condition for `field` using that field's operator and
    /// value rules.
    pub fn condition(&mut self, field: &str) -> Result<Condition, SamplerError> {
        let value = self.value(field)?;
        let operator = choose_operator(&mut self.rng, field, self.rules.equality_ratio);
        Ok(Condition::new(field, operator, value))
    }

    fn value(&mut self, field: &str) -> Result<Value, SamplerError> {
        let domain = self.domain.get(field)?;
        generate_value(domain, &mut self.rng).ok_or_else(|| SamplerError::InvalidDomain {
            field: field.to_string(),
            reason: domain.check().err().unwrap_or_else(|| "no value".to_string()),
        })
    }

    fn int_value(&mut self, field: &str) -> Result<i64, SamplerError> {
        match self.value(field)? {
            Value::Int(v) => Ok(v),
            other => Err(unexpected(field, "an integer", &other)),
        }
    }

    fn float_value(&mut self, field: &str) -> Result<f64, SamplerError> {
        match self.value(field)? {
            Value::Float(v) => Ok(v),
            other => Err(unexpected(field, "a float", &other)),
        }
    }

    fn text_value(&mut self, field: &str) -> Result<String, SamplerError> {
        match self.value(field)? {
            Value::Text(v) => Ok(v),
            other => Err(unexpected(field, "text", &other)),
        }
    }

    fn date_value(&mut self, field: &str) -> Result<NaiveDate, SamplerError> {
        match self.value(field)? {
            Value::Date(v) => Ok(v),
            other => Err(unexpected(field, "a date", &other)),
        }
    }
}

fn unexpected(field: &str, expected: &str, got: &Value) -> SamplerError {
    SamplerError::InvalidDomain {
        field: field.to_string(),
        reason: format!("expected {expected}, generated {got:?}"),
    }
}
