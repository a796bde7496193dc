//! Generator configuration.
//!
//! The configuration is read once at startup from a JSON or YAML file and
//! is read-only for the rest of the run. Every key is optional:
//!
//! ```json
//! {
//!   "numPublications": 10000,
//!   "numSubscriptions": 10000,
//!   "numThreads": 4,
//!   "equalityRatio": 70,
//!   "fieldFrequencies": { "city": 90, "temp": 70, "wind": 30, "date": 30 },
//!   "seed": 42,
//!   "fieldDomains": { "humidity": { "type": "int_range", "min": 0, "max": 100 } },
//!   "joinTimeoutSecs": 60
//! }
//! ```
//!
//! Frequencies and the equality ratio are independent percentages; they are
//! never normalized to sum to 100.

use crate::domain::{
    AttributeDomain, DomainError, FieldDomain, CITY, DATE, PRIMARY_SUBSCRIPTION_FIELDS, TEMP, WIND,
};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

// ============================================================================
// Error Types
// ============================================================================

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML
    #[error("Unsupported config format: {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// A frequency names a field with no registered domain
    #[error("Unknown field in fieldFrequencies: {0}")]
    UnknownField(String),

    /// A percentage is outside `[0, 100]`
    #[error("{key} must be a percentage between 0 and 100, got {value}")]
    InvalidPercentage { key: String, value: u32 },

    /// numThreads is zero
    #[error("numThreads must be at least 1")]
    InvalidThreadCount,

    /// A custom field domain is empty or malformed
    #[error("Invalid domain for field '{field}': {reason}")]
    InvalidDomain { field: String, reason: String },

    /// Domain registry error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

// ============================================================================
// Ordered map
// ============================================================================

/// String-keyed map that keeps entries in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Target percentage of subscriptions containing each field.
pub type FieldFrequencies = OrderedMap<u32>;

// ============================================================================
// Configuration
// ============================================================================

/// Run configuration for the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    #[serde(default = "default_num_publications")]
    pub num_publications: u64,

    #[serde(default = "default_num_subscriptions")]
    pub num_subscriptions: u64,

    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Percentage of city conditions using `=`
    #[serde(default = "default_equality_ratio")]
    pub equality_ratio: u32,

    /// Defaults apply only when the key is absent; an explicit empty map
    /// stays empty.
    #[serde(default = "default_field_frequencies")]
    pub field_frequencies: FieldFrequencies,

    /// Base seed. Absent means every worker seeds itself from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Extra fields registered on top of the built-in ones
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub field_domains: OrderedMap<FieldDomain>,

    /// Upper bound on how long a generation phase may take to join
    #[serde(default = "default_join_timeout_secs")]
    pub join_timeout_secs: u64,
}

fn default_num_publications() -> u64 {
    10
}

fn default_num_subscriptions() -> u64 {
    10
}

fn default_num_threads() -> usize {
    4
}

fn default_equality_ratio() -> u32 {
    70
}

fn default_join_timeout_secs() -> u64 {
    60
}

/// city=90, temp=70, wind=30, date=30
pub fn default_field_frequencies() -> FieldFrequencies {
    [(CITY, 90), (TEMP, 70), (WIND, 30), (DATE, 30)]
        .into_iter()
        .map(|(field, pct)| (field.to_string(), pct))
        .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_publications: default_num_publications(),
            num_subscriptions: default_num_subscriptions(),
            num_threads: default_num_threads(),
            equality_ratio: default_equality_ratio(),
            field_frequencies: default_field_frequencies(),
            seed: None,
            field_domains: OrderedMap::new(),
            join_timeout_secs: default_join_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Frequency of a field, 0 when the field is not configured.
    pub fn frequency(&self, field: &str) -> u32 {
        self.field_frequencies.get(field).copied().unwrap_or(0)
    }

    /// Build the attribute registry: built-in fields plus `fieldDomains`.
    pub fn attribute_domain(&self) -> Result<AttributeDomain, ConfigError> {
        for (field, domain) in self.field_domains.iter() {
            domain.check().map_err(|reason| ConfigError::InvalidDomain {
                field: field.to_string(),
                reason,
            })?;
        }
        Ok(AttributeDomain::builtin().with_custom(self.field_domains.clone())?)
    }

    /// Validate the configuration and return the attribute registry it
    /// describes.
    ///
    /// Every field named in `fieldFrequencies` must be registered, so that
    /// sampling never has to guess how to generate a value.
    pub fn validate(&self) -> Result<AttributeDomain, ConfigError> {
        if self.num_threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        check_percentage("equalityRatio", self.equality_ratio)?;

        let domain = self.attribute_domain()?;
        for (field, &pct) in self.field_frequencies.iter() {
            check_percentage(&format!("fieldFrequencies.{field}"), pct)?;
            if !domain.is_registered(field) {
                return Err(ConfigError::UnknownField(field.to_string()));
            }
        }
        Ok(domain)
    }

    /// Fields a subscription considers, in evaluation order: city, temp,
    /// wind, date, then every other configured field in document order.
    pub fn subscription_fields(&self) -> Vec<&str> {
        PRIMARY_SUBSCRIPTION_FIELDS
            .into_iter()
            .chain(
                self.field_frequencies
                    .keys()
                    .filter(|field| !PRIMARY_SUBSCRIPTION_FIELDS.contains(field)),
            )
            .collect()
    }
}

fn check_percentage(key: &str, value: u32) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::InvalidPercentage {
            key: key.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.num_publications, 10);
        assert_eq!(config.num_subscriptions, 10);
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.equality_ratio, 70);
        assert_eq!(config.frequency("city"), 90);
        assert_eq!(config.frequency("temp"), 70);
        assert_eq!(config.frequency("wind"), 30);
        assert_eq!(config.frequency("date"), 30);
        assert_eq!(config.join_timeout_secs, 60);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_explicit_empty_frequencies_stay_empty() {
        let config = GeneratorConfig::from_json(r#"{"fieldFrequencies": {}}"#).unwrap();
        assert!(config.field_frequencies.is_empty());
        assert_eq!(config.frequency("city"), 0);
    }

    #[test]
    fn test_frequencies_keep_document_order() {
        let json = r#"{"fieldFrequencies": {"wind": 10, "rain": 20, "city": 30, "stationId": 5}}"#;
        let config = GeneratorConfig::from_json(json).unwrap();

        let keys: Vec<&str> = config.field_frequencies.keys().collect();
        assert_eq!(keys, vec!["wind", "rain", "city", "stationId"]);
        assert_eq!(
            config.subscription_fields(),
            vec!["city", "temp", "wind", "date", "rain", "stationId"]
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
numPublications: 100
numThreads: 2
fieldFrequencies:
  temp: 50
  humidity: 20
fieldDomains:
  humidity:
    type: int_range
    min: 0
    max: 100
seed: 7
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.num_publications, 100);
        assert_eq!(config.num_subscriptions, 10);
        assert_eq!(config.num_threads, 2);
        assert_eq!(config.seed, Some(7));

        let domain = config.validate().unwrap();
        assert_eq!(domain.range("humidity").unwrap(), (0, 100));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"numSubscriptions": 250}}"#).unwrap();

        let config = GeneratorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.num_subscriptions, 250);

        let other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            GeneratorConfig::from_file(other.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GeneratorConfig::from_file("/nonexistent/config.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GeneratorConfig::from_json(r#"{"numThreads": "four"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let json = r#"{"fieldFrequencies": {"city": 50, "pressure": 10}}"#;
        let config = GeneratorConfig::from_json(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownField(field)) if field == "pressure"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_percentages() {
        let config = GeneratorConfig {
            equality_ratio: 101,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPercentage { .. })
        ));

        let config = GeneratorConfig::from_json(r#"{"fieldFrequencies": {"city": 150}}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPercentage { value: 150, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = GeneratorConfig {
            num_threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreadCount)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_custom_domain() {
        let json = r#"{"fieldDomains": {"level": {"type": "one_of", "values": []}}}"#;
        let config = GeneratorConfig::from_json(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDomain { .. })
        ));

        let json = r#"{"fieldDomains": {"city": {"type": "one_of", "values": ["Paris"]}}}"#;
        let config = GeneratorConfig::from_json(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Domain(DomainError::Duplicate(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_unrepresentable_values() {
        let json = r#"{
            "fieldFrequencies": {"city": 90, "level": 30},
            "fieldDomains": {"level": {"type": "one_of", "values": ["low", "a,b"]}}
        }"#;
        let config = GeneratorConfig::from_json(json).unwrap();
        match config.validate() {
            Err(ConfigError::InvalidDomain { field, reason }) => {
                assert_eq!(field, "level");
                assert!(reason.contains("a,b"), "reason: {reason}");
            }
            other => panic!("Expected InvalidDomain, got {other:?}"),
        }

        let json = r#"{"fieldDomains": {"level": {"type": "one_of", "values": ["{x}"]}}}"#;
        let config = GeneratorConfig::from_json(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_serialize_round_trip_order() {
        let config = GeneratorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""fieldFrequencies":{"city":90,"temp":70,"wind":30,"date":30}"#));
    }
}
