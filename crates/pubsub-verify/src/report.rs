//! Verification report types and rendering.

use crate::error::VerifyError;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

/// Expected versus actual occurrence of one configured field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStat {
    pub field: String,
    /// Configured frequency, in percent
    pub target_pct: u32,
    /// `round(subscriptions * target_pct / 100)`
    pub expected: u64,
    /// Number of conditions on this field across the corpus
    pub actual: u64,
    /// `actual / subscriptions` in percent; `None` for an empty corpus
    pub actual_pct: Option<f64>,
}

impl FieldStat {
    /// Absolute difference between actual and target, in percentage points.
    pub fn deviation_pct(&self) -> Option<f64> {
        self.actual_pct
            .map(|actual| (actual - f64::from(self.target_pct)).abs())
    }
}

/// Outcome of the city equality-ratio check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EqualityRatio {
    /// At least one city condition was seen
    Measured {
        expected_pct: u32,
        actual_pct: f64,
        equal: u64,
        total: u64,
    },
    /// No city condition in the corpus
    NotApplicable,
}

impl EqualityRatio {
    pub fn deviation_pct(&self) -> Option<f64> {
        match self {
            EqualityRatio::Measured {
                expected_pct,
                actual_pct,
                ..
            } => Some((actual_pct - f64::from(*expected_pct)).abs()),
            EqualityRatio::NotApplicable => None,
        }
    }
}

/// Result of checking publications against the attribute domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicationCheck {
    pub total: u64,
    /// Malformed lines or lines with a missing or out-of-domain field
    pub invalid: u64,
    /// Up to [`PublicationCheck::MAX_EXAMPLES`] offending records
    pub examples: Vec<String>,
}

impl PublicationCheck {
    pub const MAX_EXAMPLES: usize = 5;
}

/// Statistics of a subscription corpus against the configured targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub subscriptions: u64,
    /// One entry per configured field, in configuration order
    pub fields: Vec<FieldStat>,
    pub equality_ratio: EqualityRatio,
    /// Subscriptions without any condition
    pub empty_subscriptions: u64,
    /// Subscriptions naming the same field more than once
    pub duplicate_field_subscriptions: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<PublicationCheck>,
}

impl VerificationReport {
    /// Check every field frequency and the equality ratio against their
    /// targets, allowing `tolerance_pct` percentage points either way.
    ///
    /// Structural defects (empty subscriptions, repeated fields, invalid
    /// publications) always fail.
    pub fn within_tolerance(&self, tolerance_pct: f64) -> bool {
        self.violations(tolerance_pct).is_empty()
    }

    /// Human-readable list of everything outside tolerance.
    pub fn violations(&self, tolerance_pct: f64) -> Vec<String> {
        let mut violations = Vec::new();

        for stat in &self.fields {
            if let Some(deviation) = stat.deviation_pct() {
                if deviation > tolerance_pct {
                    violations.push(format!(
                        "{}: {:.1}% vs target {}% (off by {:.1} points)",
                        stat.field,
                        stat.actual_pct.unwrap_or_default(),
                        stat.target_pct,
                        deviation
                    ));
                }
            }
        }

        if let Some(deviation) = self.equality_ratio.deviation_pct() {
            if deviation > tolerance_pct {
                violations.push(format!(
                    "city equality ratio off by {deviation:.1} points"
                ));
            }
        }

        if self.empty_subscriptions > 0 {
            violations.push(format!(
                "{} empty subscriptions",
                self.empty_subscriptions
            ));
        }
        if self.duplicate_field_subscriptions > 0 {
            violations.push(format!(
                "{} subscriptions repeat a field",
                self.duplicate_field_subscriptions
            ));
        }
        if let Some(check) = &self.publications {
            if check.invalid > 0 {
                violations.push(format!("{} invalid publications", check.invalid));
            }
        }

        violations
    }
}

/// Format the report as a console table.
pub fn format_table(report: &VerificationReport) -> String {
    let mut output = String::new();

    output.push_str("Verification Results:\n");
    if let Some(check) = &report.publications {
        output.push_str(&format!(
            "  Total publications: {}\n",
            format_number(check.total)
        ));
    }
    output.push_str(&format!(
        "  Total subscriptions: {}\n",
        format_number(report.subscriptions)
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Target", "Expected", "Actual", "Actual %"]);

    for stat in &report.fields {
        let actual_pct = stat
            .actual_pct
            .map(|p| format!("{p:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&stat.field),
            Cell::new(format!("{}%", stat.target_pct)),
            Cell::new(format!("~{}", format_number(stat.expected))),
            Cell::new(format_number(stat.actual)),
            Cell::new(actual_pct),
        ]);
    }

    output.push_str(&table.to_string());
    output.push('\n');

    match &report.equality_ratio {
        EqualityRatio::Measured {
            expected_pct,
            actual_pct,
            equal,
            total,
        } => output.push_str(&format!(
            "City equality ratio: expected {:.1}%, actual {:.1}% ({}/{})\n",
            f64::from(*expected_pct),
            actual_pct,
            format_number(*equal),
            format_number(*total)
        )),
        EqualityRatio::NotApplicable => {
            output.push_str("City equality ratio: not applicable (no city conditions)\n")
        }
    }

    if report.empty_subscriptions > 0 || report.duplicate_field_subscriptions > 0 {
        output.push_str(&format!(
            "Malformed subscriptions: {} empty, {} with repeated fields\n",
            report.empty_subscriptions, report.duplicate_field_subscriptions
        ));
    }

    if let Some(check) = &report.publications {
        if check.invalid > 0 {
            output.push_str(&format!(
                "Invalid publications: {}\n",
                format_number(check.invalid)
            ));
            for example in &check.examples {
                output.push_str(&format!("  {example}\n"));
            }
        }
    }

    output
}

/// Format the list of tolerance violations as a colored table.
pub fn format_violations(violations: &[String]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Outside tolerance"]);
    for violation in violations {
        table.add_row(vec![Cell::new(violation).fg(Color::Red)]);
    }
    table.to_string()
}

/// Format the report as pretty-printed JSON.
pub fn format_json(report: &VerificationReport) -> Result<String, VerifyError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format number with thousands separators.
pub(crate) fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
