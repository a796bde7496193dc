//! Record text format.
//!
//! Publications and subscriptions are exchanged as one line of text each:
//!
//! ```text
//! {(stationId,12);(city,"Cluj");(temp,5);(rain,0.37);(wind,48);(direction,"NE");(date,2023-02-14)}
//! {(city,=,Cluj);(temp,<=,5);(date,>,2023-02-14)}
//! ```
//!
//! Values are not escaped, so a value containing `;`, `,`, `(` or `)` cannot
//! be represented. None of the registered domains produce such values.

use crate::record::{Operator, Publication, Subscription};
use std::fmt;

/// Error type for malformed record text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// Record is not wrapped in `{...}`
    #[error("Record is not enclosed in braces: {0}")]
    MissingBraces(String),

    /// Condition or pair is not wrapped in `(...)`
    #[error("Entry is not parenthesized: {0}")]
    Unparenthesized(String),

    /// Entry has the wrong number of comma-separated parts
    #[error("Expected {expected} parts in '{text}', found {found}")]
    WrongArity {
        text: String,
        expected: usize,
        found: usize,
    },

    /// Operator text is not one of `=`, `<`, `>`, `<=`, `>=`
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{(stationId,{});(city,\"{}\");(temp,{});(rain,{:.2});(wind,{});(direction,\"{}\");(date,{})}}",
            self.station_id,
            self.city,
            self.temp,
            self.rain,
            self.wind,
            self.direction,
            self.date.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, condition) in self.conditions().iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(
                f,
                "({},{},{})",
                condition.field, condition.operator, condition.value
            )?;
        }
        f.write_str("}")
    }
}

/// A condition read back from subscription text. The value stays textual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCondition {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// Parse one subscription line into its conditions, in order.
///
/// `{}` parses to an empty list so that callers can count empty
/// subscriptions instead of failing on them.
pub fn parse_subscription(line: &str) -> Result<Vec<ParsedCondition>, FormatError> {
    entries(line)?
        .into_iter()
        .map(|entry| {
            let parts: Vec<&str> = entry.split(',').collect();
            if parts.len() != 3 {
                return Err(FormatError::WrongArity {
                    text: entry.to_string(),
                    expected: 3,
                    found: parts.len(),
                });
            }
            Ok(ParsedCondition {
                field: parts[0].to_string(),
                operator: parts[1].parse()?,
                value: parts[2].to_string(),
            })
        })
        .collect()
}

/// Parse one publication line into `(field, value)` pairs, in order, with
/// string quotes removed.
pub fn parse_publication(line: &str) -> Result<Vec<(String, String)>, FormatError> {
    entries(line)?
        .into_iter()
        .map(|entry| {
            let (field, value) = entry
                .split_once(',')
                .ok_or_else(|| FormatError::WrongArity {
                    text: entry.to_string(),
                    expected: 2,
                    found: 1,
                })?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Ok((field.to_string(), value.to_string()))
        })
        .collect()
}

/// Split `{(a);(b)}` into the parenthesized bodies `a`, `b`.
fn entries(line: &str) -> Result<Vec<&str>, FormatError> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| FormatError::MissingBraces(trimmed.to_string()))?;

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(';')
        .map(|part| {
            part.strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| FormatError::Unparenthesized(part.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Condition, Value};
    use chrono::NaiveDate;

    fn sample_publication() -> Publication {
        Publication {
            station_id: 12,
            city: "Cluj".to_string(),
            temp: -3,
            rain: 0.371,
            wind: 48,
            direction: "NE".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 2, 14).unwrap(),
        }
    }

    fn sample_subscription() -> Subscription {
        let mut builder = Subscription::builder();
        builder.insert(Condition::new(
            "city",
            Operator::Eq,
            Value::Text("Cluj".to_string()),
        ));
        builder.insert(Condition::new("temp", Operator::Le, Value::Int(5)));
        builder.insert(Condition::new(
            "date",
            Operator::Gt,
            Value::Date(NaiveDate::from_ymd_opt(2023, 2, 3).unwrap()),
        ));
        builder.build().unwrap()
    }

    #[test]
    fn test_publication_display() {
        assert_eq!(
            sample_publication().to_string(),
            r#"{(stationId,12);(city,"Cluj");(temp,-3);(rain,0.37);(wind,48);(direction,"NE");(date,2023-02-14)}"#
        );
    }

    #[test]
    fn test_subscription_display() {
        assert_eq!(
            sample_subscription().to_string(),
            "{(city,=,Cluj);(temp,<=,5);(date,>,2023-02-03)}"
        );
    }

    #[test]
    fn test_subscription_round_trip_keeps_order() {
        let sub = sample_subscription();
        let parsed = parse_subscription(&sub.to_string()).unwrap();

        assert_eq!(parsed.len(), sub.len());
        for (parsed, original) in parsed.iter().zip(sub.conditions()) {
            assert_eq!(parsed.field, original.field);
            assert_eq!(parsed.operator, original.operator);
            assert_eq!(parsed.value, original.value.to_string());
        }
    }

    #[test]
    fn test_parse_publication() {
        let pairs = parse_publication(&sample_publication().to_string()).unwrap();
        let fields: Vec<&str> = pairs.iter().map(|(f, _)| f.as_str()).collect();

        assert_eq!(
            fields,
            vec!["stationId", "city", "temp", "rain", "wind", "direction", "date"]
        );
        assert_eq!(pairs[1].1, "Cluj");
        assert_eq!(pairs[3].1, "0.37");
    }

    #[test]
    fn test_parse_empty_subscription() {
        assert!(parse_subscription("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_subscription("(city,=,Cluj)"),
            Err(FormatError::MissingBraces(_))
        ));
        assert!(matches!(
            parse_subscription("{city,=,Cluj}"),
            Err(FormatError::Unparenthesized(_))
        ));
        assert!(matches!(
            parse_subscription("{(city,Cluj)}"),
            Err(FormatError::WrongArity { found: 2, .. })
        ));
        assert!(matches!(
            parse_subscription("{(city,!=,Cluj)}"),
            Err(FormatError::UnknownOperator(_))
        ));
        assert!(matches!(
            parse_publication("{(stationId)}"),
            Err(FormatError::WrongArity { .. })
        ));
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let parsed = parse_subscription("  {(wind,>=,10)}\n").unwrap();
        assert_eq!(parsed[0].operator, Operator::Ge);
        assert_eq!(parsed[0].value, "10");
    }
}
