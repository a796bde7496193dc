//! Corpus verification against the configured targets.
//!
//! Subscriptions can be verified either in memory, straight from the
//! generator, or from their textual form as written to disk. Both paths
//! feed the same tally so their reports are identical for the same corpus.

use crate::error::VerifyError;
use crate::report::{EqualityRatio, FieldStat, PublicationCheck, VerificationReport};
use pubsub_core::domain::{CITY, DATE, DIRECTION, RAIN, STATION_ID, TEMP, WIND};
use pubsub_core::{
    parse_publication, parse_subscription, AttributeDomain, GeneratorConfig, Operator,
    Publication, Subscription,
};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Fields every publication must carry.
const PUBLICATION_FIELDS: [&str; 7] = [STATION_ID, CITY, TEMP, RAIN, WIND, DIRECTION, DATE];

/// Verifies generated corpora against a generator configuration.
#[derive(Debug, Clone)]
pub struct CorpusVerifier {
    targets: Vec<(String, u32)>,
    equality_ratio: u32,
    domain: AttributeDomain,
}

impl CorpusVerifier {
    /// Build a verifier for the corpus `config` describes.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, VerifyError> {
        let domain = config.validate()?;
        let targets = config
            .field_frequencies
            .iter()
            .map(|(field, &pct)| (field.to_string(), pct))
            .collect();

        Ok(Self {
            targets,
            equality_ratio: config.equality_ratio,
            domain,
        })
    }

    /// Verify subscriptions produced in memory.
    pub fn verify_subscriptions(&self, subscriptions: &[Subscription]) -> VerificationReport {
        let mut tally = Tally::default();
        for subscription in subscriptions {
            tally.observe(
                subscription
                    .conditions()
                    .iter()
                    .map(|c| (c.field.as_str(), c.operator)),
            );
        }
        self.report(tally)
    }

    /// Verify subscriptions in their textual form, one per line.
    ///
    /// Blank lines are skipped. A line that does not parse fails the whole
    /// verification with its 1-based line number.
    pub fn verify_subscription_lines<I, S>(&self, lines: I) -> Result<VerificationReport, VerifyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tally = Tally::default();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let conditions = parse_subscription(line).map_err(|source| VerifyError::Format {
                line: index + 1,
                source,
            })?;
            tally.observe(conditions.iter().map(|c| (c.field.as_str(), c.operator)));
        }
        Ok(self.report(tally))
    }

    /// Verify a subscription file written by the generator.
    pub fn verify_subscription_file(&self, path: &Path) -> Result<VerificationReport, VerifyError> {
        info!("Verifying subscriptions from {}", path.display());
        let lines = read_lines(path)?;
        self.verify_subscription_lines(lines)
    }

    /// Check that every publication line carries all fields with in-domain
    /// values. Malformed lines count as invalid rather than failing.
    pub fn check_publication_lines<I, S>(&self, lines: I) -> PublicationCheck
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut check = PublicationCheck::default();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            check.total += 1;

            if let Err(reason) = self.check_publication(line) {
                check.invalid += 1;
                debug!("Invalid publication {}: {}", line, reason);
                if check.examples.len() < PublicationCheck::MAX_EXAMPLES {
                    check.examples.push(format!("{line} ({reason})"));
                }
            }
        }

        if check.invalid > 0 {
            warn!(
                "{} of {} publications are invalid",
                check.invalid, check.total
            );
        }
        check
    }

    /// Check publications produced in memory, through their textual form.
    pub fn check_publications(&self, publications: &[Publication]) -> PublicationCheck {
        self.check_publication_lines(publications.iter().map(|p| p.to_string()))
    }

    /// Check a publication file written by the generator.
    pub fn check_publication_file(&self, path: &Path) -> Result<PublicationCheck, VerifyError> {
        info!("Checking publications from {}", path.display());
        let lines = read_lines(path)?;
        Ok(self.check_publication_lines(lines))
    }

    fn check_publication(&self, line: &str) -> Result<(), String> {
        let pairs = parse_publication(line).map_err(|e| e.to_string())?;

        let mut seen = HashSet::new();
        for (field, value) in &pairs {
            if !seen.insert(field.as_str()) {
                return Err(format!("{field} appears twice"));
            }
            match self.domain.contains(field, value) {
                Ok(true) => {}
                Ok(false) => return Err(format!("{field} value {value} is out of range")),
                Err(e) => return Err(e.to_string()),
            }
        }

        match PUBLICATION_FIELDS.iter().find(|f| !seen.contains(*f)) {
            Some(missing) => Err(format!("missing {missing}")),
            None => Ok(()),
        }
    }

    fn report(&self, tally: Tally) -> VerificationReport {
        let n = tally.subscriptions;

        let fields: Vec<FieldStat> = self
            .targets
            .iter()
            .map(|(field, pct)| {
                let actual = tally.field_counts.get(field).copied().unwrap_or(0);
                FieldStat {
                    field: field.clone(),
                    target_pct: *pct,
                    expected: (n * u64::from(*pct) + 50) / 100,
                    actual,
                    actual_pct: percentage(actual, n),
                }
            })
            .collect();

        let equality_ratio = match percentage(tally.city_equal, tally.city_total) {
            Some(actual_pct) => EqualityRatio::Measured {
                expected_pct: self.equality_ratio,
                actual_pct,
                equal: tally.city_equal,
                total: tally.city_total,
            },
            None => EqualityRatio::NotApplicable,
        };

        for stat in &fields {
            info!(
                "{}: expected ~{}, actual {} ({:.1}%)",
                stat.field,
                stat.expected,
                stat.actual,
                stat.actual_pct.unwrap_or_default()
            );
        }
        match &equality_ratio {
            EqualityRatio::Measured { actual_pct, .. } => info!(
                "City equality ratio: expected {}%, actual {:.1}%",
                self.equality_ratio, actual_pct
            ),
            EqualityRatio::NotApplicable => info!("City equality ratio: not applicable"),
        }
        if tally.empty > 0 || tally.duplicate_fields > 0 {
            warn!(
                "{} empty subscriptions, {} with repeated fields",
                tally.empty, tally.duplicate_fields
            );
        }

        VerificationReport {
            subscriptions: n,
            fields,
            equality_ratio,
            empty_subscriptions: tally.empty,
            duplicate_field_subscriptions: tally.duplicate_fields,
            publications: None,
        }
    }
}

/// Running counts over a subscription corpus.
#[derive(Debug, Default)]
struct Tally {
    subscriptions: u64,
    field_counts: HashMap<String, u64>,
    city_total: u64,
    city_equal: u64,
    empty: u64,
    duplicate_fields: u64,
}

impl Tally {
    fn observe<'a>(&mut self, conditions: impl Iterator<Item = (&'a str, Operator)>) {
        self.subscriptions += 1;

        let mut seen = HashSet::new();
        let mut repeated = false;
        for (field, operator) in conditions {
            if !seen.insert(field) {
                repeated = true;
            }
            *self.field_counts.entry(field.to_string()).or_insert(0) += 1;
            if field == CITY {
                self.city_total += 1;
                if operator == Operator::Eq {
                    self.city_equal += 1;
                }
            }
        }

        if seen.is_empty() {
            self.empty += 1;
        }
        if repeated {
            self.duplicate_fields += 1;
        }
    }
}

fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 * 100.0 / whole as f64)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, VerifyError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.lines().collect::<Result<Vec<_>, _>>()?)
}
