//! Publication and subscription records.

use crate::format::FormatError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Comparison operator of a subscription condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

impl Operator {
    /// Every operator, equality first.
    pub const ALL: [Operator; 5] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::Le,
        Operator::Ge,
    ];

    /// Every operator except equality.
    pub const INEQUALITIES: [Operator; 4] =
        [Operator::Lt, Operator::Gt, Operator::Le, Operator::Ge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            _ => Err(FormatError::UnknownOperator(s.to_string())),
        }
    }
}

/// A generated field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Text(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

/// One `(field, operator, value)` predicate of a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// A synthetic sensor reading. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub station_id: i64,
    pub city: String,
    pub temp: i64,
    pub rain: f64,
    pub wind: i64,
    pub direction: String,
    pub date: NaiveDate,
}

/// A conjunction of conditions, at most one per field, kept in the order
/// the fields were decided.
///
/// A `Subscription` is never empty; use [`SubscriptionBuilder`] to assemble
/// one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    conditions: Vec<Condition>,
}

impl Subscription {
    pub fn builder() -> SubscriptionBuilder {
        SubscriptionBuilder::default()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.field == field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Incrementally assembles a [`Subscription`].
#[derive(Debug, Clone, Default)]
pub struct SubscriptionBuilder {
    conditions: Vec<Condition>,
}

impl SubscriptionBuilder {
    /// Add a condition. Returns false, leaving the builder unchanged, if the
    /// field already has a condition.
    pub fn insert(&mut self, condition: Condition) -> bool {
        if self.conditions.iter().any(|c| c.field == condition.field) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Finish the subscription. Returns `None` when no condition was added.
    pub fn build(self) -> Option<Subscription> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(Subscription {
                conditions: self.conditions,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert!(matches!(
            "!=".parse::<Operator>(),
            Err(FormatError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_inequalities_exclude_eq() {
        assert!(!Operator::INEQUALITIES.contains(&Operator::Eq));
        assert_eq!(Operator::INEQUALITIES.len() + 1, Operator::ALL.len());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(-5).to_string(), "-5");
        assert_eq!(Value::Float(7.456).to_string(), "7.46");
        assert_eq!(Value::Text("Cluj".to_string()).to_string(), "Cluj");
        let date = NaiveDate::from_ymd_opt(2023, 2, 7).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2023-02-07");
    }

    #[test]
    fn test_builder_rejects_duplicate_field() {
        let mut builder = Subscription::builder();
        assert!(builder.insert(Condition::new("temp", Operator::Lt, Value::Int(10))));
        assert!(!builder.insert(Condition::new("temp", Operator::Gt, Value::Int(0))));
        assert_eq!(builder.len(), 1);

        let sub = builder.build().unwrap();
        assert_eq!(sub.get("temp").unwrap().operator, Operator::Lt);
    }

    #[test]
    fn test_builder_empty() {
        assert!(Subscription::builder().build().is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut builder = Subscription::builder();
        builder.insert(Condition::new("wind", Operator::Ge, Value::Int(5)));
        builder.insert(Condition::new("city", Operator::Eq, Value::Text("Iasi".into())));
        let sub = builder.build().unwrap();

        let fields: Vec<&str> = sub.conditions().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["wind", "city"]);
    }
}
