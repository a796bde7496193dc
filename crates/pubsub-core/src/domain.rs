//! Attribute domains for publication and subscription fields.
//!
//! [`AttributeDomain`] is the single registry of every field the generator
//! knows about: its value range or enumeration, and the comparison
//! operators a subscription may apply to it. The built-in fields describe
//! a weather-station reading; extra fields can be registered from
//! configuration with [`AttributeDomain::with_custom`].

use crate::record::Operator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

// ============================================================================
// Built-in fields
// ============================================================================

pub const STATION_ID: &str = "stationId";
pub const CITY: &str = "city";
pub const TEMP: &str = "temp";
pub const RAIN: &str = "rain";
pub const WIND: &str = "wind";
pub const DIRECTION: &str = "direction";
pub const DATE: &str = "date";

/// Cities a station can report from.
pub const CITIES: [&str; 5] = ["Bucuresti", "Cluj", "Timisoara", "Iasi", "Constanta"];

/// Compass points for wind direction.
pub const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Year and month every generated date falls into.
pub const DATE_YEAR: i32 = 2023;
pub const DATE_MONTH: u32 = 2;

/// Fields a subscription always considers first, in this order.
pub const PRIMARY_SUBSCRIPTION_FIELDS: [&str; 4] = [CITY, TEMP, WIND, DATE];

// ============================================================================
// Error Types
// ============================================================================

/// Error type for domain lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Field has no registered domain
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Field exists but its domain has a different shape
    #[error("Field '{field}' is not {expected}")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },

    /// Field registered twice
    #[error("Field '{0}' is already registered")]
    Duplicate(String),
}

// ============================================================================
// Field domains
// ============================================================================

/// Characters that delimit records, conditions or quoted values.
const RESERVED_CHARS: &[char] = &[',', ';', '(', ')', '{', '}', '"'];

fn is_reserved(c: char) -> bool {
    RESERVED_CHARS.contains(&c) || c.is_control()
}

/// Value space of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDomain {
    /// Integers in `[min, max]`
    IntRange { min: i64, max: i64 },

    /// Floats in `[min, max)`
    FloatRange { min: f64, max: f64 },

    /// One value out of a closed enumeration
    OneOf { values: Vec<String> },

    /// A day of month within a fixed month, rendered as `YYYY-MM-DD`
    DayOfMonth {
        year: i32,
        month: u32,
        first_day: u32,
        last_day: u32,
    },
}

impl FieldDomain {
    /// Short name of the domain kind, used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldDomain::IntRange { .. } => "an integer range",
            FieldDomain::FloatRange { .. } => "a float range",
            FieldDomain::OneOf { .. } => "an enumeration",
            FieldDomain::DayOfMonth { .. } => "a date range",
        }
    }

    /// Check that the domain can produce at least one value.
    pub fn check(&self) -> Result<(), String> {
        match self {
            FieldDomain::IntRange { min, max } if min > max => {
                Err(format!("min {min} is greater than max {max}"))
            }
            FieldDomain::FloatRange { min, max }
                if min.partial_cmp(max) != Some(Ordering::Less) =>
            {
                Err(format!("min {min} must be less than max {max}"))
            }
            FieldDomain::OneOf { values } => {
                if values.is_empty() {
                    return Err("enumeration has no values".to_string());
                }
                for value in values {
                    if value.is_empty() {
                        return Err("enumeration contains an empty value".to_string());
                    }
                    if let Some(c) = value.chars().find(|c| is_reserved(*c)) {
                        return Err(format!(
                            "value {value:?} contains {c:?}, which the record format cannot represent"
                        ));
                    }
                }
                Ok(())
            }
            FieldDomain::DayOfMonth {
                year,
                month,
                first_day,
                last_day,
            } => {
                if first_day > last_day {
                    return Err(format!("first day {first_day} is after last day {last_day}"));
                }
                for day in [first_day, last_day] {
                    if NaiveDate::from_ymd_opt(*year, *month, *day).is_none() {
                        return Err(format!("{year}-{month:02}-{day:02} is not a valid date"));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Check whether a textual value (as found in the record format) lies
    /// within this domain.
    pub fn contains_text(&self, text: &str) -> bool {
        match self {
            FieldDomain::IntRange { min, max } => text
                .parse::<i64>()
                .map(|v| (*min..=*max).contains(&v))
                .unwrap_or(false),
            FieldDomain::FloatRange { min, max } => text
                .parse::<f64>()
                // rain is printed with 2 decimals, so values close to max round up to it
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            FieldDomain::OneOf { values } => values.iter().any(|v| v == text),
            FieldDomain::DayOfMonth {
                year,
                month,
                first_day,
                last_day,
            } => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                Ok(date) => {
                    use chrono::Datelike;
                    date.year() == *year
                        && date.month() == *month
                        && (*first_day..=*last_day).contains(&date.day())
                }
                Err(_) => false,
            },
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of every known field and its domain.
///
/// Lookups are pure; the registry is built once per run and then shared
/// read-only between workers.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDomain {
    fields: Vec<(String, FieldDomain)>,
    index: HashMap<String, usize>,
}

impl Default for AttributeDomain {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AttributeDomain {
    /// The built-in weather-station fields, in publication order.
    pub fn builtin() -> Self {
        let fields = vec![
            (STATION_ID.to_string(), FieldDomain::IntRange { min: 1, max: 100 }),
            (CITY.to_string(), one_of(&CITIES)),
            (TEMP.to_string(), FieldDomain::IntRange { min: -20, max: 40 }),
            (RAIN.to_string(), FieldDomain::FloatRange { min: 0.0, max: 10.0 }),
            (WIND.to_string(), FieldDomain::IntRange { min: 0, max: 100 }),
            (DIRECTION.to_string(), one_of(&DIRECTIONS)),
            (
                DATE.to_string(),
                FieldDomain::DayOfMonth {
                    year: DATE_YEAR,
                    month: DATE_MONTH,
                    first_day: 1,
                    last_day: 28,
                },
            ),
        ];
        let mut domain = Self {
            fields,
            index: HashMap::new(),
        };
        domain.build_index();
        domain
    }

    /// Register extra fields on top of the current ones.
    pub fn with_custom<I>(mut self, extra: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (String, FieldDomain)>,
    {
        for (name, domain) in extra {
            if self.index.contains_key(&name) {
                return Err(DomainError::Duplicate(name));
            }
            self.index.insert(name.clone(), self.fields.len());
            self.fields.push((name, domain));
        }
        Ok(self)
    }

    fn build_index(&mut self) {
        self.index = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| (name.clone(), idx))
            .collect();
    }

    /// Look up the domain of a field.
    pub fn get(&self, field: &str) -> Result<&FieldDomain, DomainError> {
        self.index
            .get(field)
            .map(|&idx| &self.fields[idx].1)
            .ok_or_else(|| DomainError::UnknownField(field.to_string()))
    }

    pub fn is_registered(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Inclusive integer bounds of a field.
    ///
    /// Date fields report their day-of-month bounds.
    pub fn range(&self, field: &str) -> Result<(i64, i64), DomainError> {
        match self.get(field)? {
            FieldDomain::IntRange { min, max } => Ok((*min, *max)),
            FieldDomain::DayOfMonth {
                first_day,
                last_day,
                ..
            } => Ok((i64::from(*first_day), i64::from(*last_day))),
            _ => Err(DomainError::KindMismatch {
                field: field.to_string(),
                expected: "an integer range",
            }),
        }
    }

    /// Bounds of a float field, `[min, max)`.
    pub fn float_range(&self, field: &str) -> Result<(f64, f64), DomainError> {
        match self.get(field)? {
            FieldDomain::FloatRange { min, max } => Ok((*min, *max)),
            _ => Err(DomainError::KindMismatch {
                field: field.to_string(),
                expected: "a float range",
            }),
        }
    }

    /// Allowed values of an enumerated field, in declaration order.
    pub fn values(&self, field: &str) -> Result<&[String], DomainError> {
        match self.get(field)? {
            FieldDomain::OneOf { values } => Ok(values),
            _ => Err(DomainError::KindMismatch {
                field: field.to_string(),
                expected: "an enumeration",
            }),
        }
    }

    /// Operators a subscription may use on a field.
    pub fn operators(&self, field: &str) -> Result<&'static [Operator], DomainError> {
        self.get(field)?;
        Ok(&Operator::ALL)
    }

    /// Check a textual value against a field's domain.
    pub fn contains(&self, field: &str, text: &str) -> Result<bool, DomainError> {
        Ok(self.get(field)?.contains_text(text))
    }

    /// Registered field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn one_of(values: &[&str]) -> FieldDomain {
    FieldDomain::OneOf {
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ranges() {
        let domain = AttributeDomain::builtin();

        assert_eq!(domain.range(STATION_ID).unwrap(), (1, 100));
        assert_eq!(domain.range(TEMP).unwrap(), (-20, 40));
        assert_eq!(domain.range(WIND).unwrap(), (0, 100));
        assert_eq!(domain.range(DATE).unwrap(), (1, 28));
        assert_eq!(domain.float_range(RAIN).unwrap(), (0.0, 10.0));
        assert_eq!(domain.values(CITY).unwrap().len(), 5);
        assert_eq!(domain.values(DIRECTION).unwrap().len(), 8);
    }

    #[test]
    fn test_builtin_field_order() {
        let domain = AttributeDomain::builtin();
        let names: Vec<&str> = domain.field_names().collect();
        assert_eq!(
            names,
            vec!["stationId", "city", "temp", "rain", "wind", "direction", "date"]
        );
    }

    #[test]
    fn test_unknown_field() {
        let domain = AttributeDomain::builtin();
        assert_eq!(
            domain.range("humidity"),
            Err(DomainError::UnknownField("humidity".to_string()))
        );
        assert!(matches!(
            domain.values("pressure"),
            Err(DomainError::UnknownField(_))
        ));
        assert!(domain.operators("nope").is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let domain = AttributeDomain::builtin();
        assert!(matches!(
            domain.values(TEMP),
            Err(DomainError::KindMismatch { .. })
        ));
        assert!(matches!(
            domain.range(CITY),
            Err(DomainError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_with_custom() {
        let domain = AttributeDomain::builtin()
            .with_custom(vec![(
                "humidity".to_string(),
                FieldDomain::IntRange { min: 0, max: 100 },
            )])
            .unwrap();

        assert!(domain.is_registered("humidity"));
        assert_eq!(domain.range("humidity").unwrap(), (0, 100));
        assert_eq!(domain.field_names().last(), Some("humidity"));
    }

    #[test]
    fn test_check_rejects_format_delimiters() {
        for bad in ["a,b", "x;y", "(v)", "{v}", "say \"hi\"", "two\nlines", ""] {
            let domain = one_of(&["ok", bad]);
            assert!(domain.check().is_err(), "{bad:?} should be rejected");
        }
        assert!(one_of(&["North East", "São Paulo"]).check().is_ok());
        let builtin = AttributeDomain::builtin();
        for name in builtin.field_names() {
            assert_eq!(builtin.get(name).unwrap().check(), Ok(()), "{name}");
        }
    }

    #[test]
    fn test_with_custom_rejects_duplicates() {
        let result = AttributeDomain::builtin().with_custom(vec![(
            CITY.to_string(),
            FieldDomain::OneOf {
                values: vec!["Paris".to_string()],
            },
        )]);
        assert_eq!(result, Err(DomainError::Duplicate(CITY.to_string())));
    }

    #[test]
    fn test_contains_text() {
        let domain = AttributeDomain::builtin();

        assert!(domain.contains(TEMP, "-20").unwrap());
        assert!(!domain.contains(TEMP, "41").unwrap());
        assert!(domain.contains(RAIN, "9.99").unwrap());
        assert!(!domain.contains(RAIN, "-0.01").unwrap());
        assert!(domain.contains(CITY, "Cluj").unwrap());
        assert!(!domain.contains(CITY, "Paris").unwrap());
        assert!(domain.contains(DATE, "2023-02-28").unwrap());
        assert!(!domain.contains(DATE, "2023-03-01").unwrap());
        assert!(!domain.contains(DATE, "not-a-date").unwrap());
    }

    #[test]
    fn test_check_domains() {
        assert!(FieldDomain::IntRange { min: 5, max: 1 }.check().is_err());
        assert!(FieldDomain::FloatRange { min: 1.0, max: 1.0 }
            .check()
            .is_err());
        assert!(FieldDomain::OneOf { values: vec![] }.check().is_err());
        assert!(FieldDomain::DayOfMonth {
            year: 2023,
            month: 2,
            first_day: 1,
            last_day: 30
        }
        .check()
        .is_err());
        assert!(AttributeDomain::builtin()
            .get(DATE)
            .unwrap()
            .check()
            .is_ok());
    }

    #[test]
    fn test_parse_custom_domain_yaml() {
        let yaml = r#"
type: one_of
values: [low, high]
"#;
        let domain: FieldDomain = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            domain,
            FieldDomain::OneOf {
                values: vec!["low".to_string(), "high".to_string()]
            }
        );
    }
}
