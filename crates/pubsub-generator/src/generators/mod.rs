//! Individual value generators for the different field domains.
//!
//! This module provides the generation logic for each kind of value
//! based on the field's domain, plus the operator choice for subscription
//! conditions.

pub mod categorical;
pub mod date;
pub mod numeric;
pub mod operator;

use pubsub_core::{FieldDomain, Value};
use rand::Rng;

/// Generate a uniformly distributed value from a field domain.
///
/// Returns `None` only for domains that cannot produce a value (an empty
/// enumeration or an impossible date); validated configurations never
/// contain those.
pub fn generate_value<R: Rng>(domain: &FieldDomain, rng: &mut R) -> Option<Value> {
    match domain {
        FieldDomain::IntRange { min, max } => Some(numeric::generate_int_range(rng, *min, *max)),

        FieldDomain::FloatRange { min, max } => {
            Some(numeric::generate_float_range(rng, *min, *max))
        }

        FieldDomain::OneOf { values } => categorical::generate_one_of(rng, values),

        FieldDomain::DayOfMonth {
            year,
            month,
            first_day,
            last_day,
        } => date::generate_day_of_month(rng, *year, *month, *first_day, *last_day),
    }
}
