//! Numeric value generators.

use pubsub_core::Value;
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    Value::Int(rng.gen_range(min..=max))
}

/// Generate a random float in `[min, max)`.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    Value::Float(rng.gen_range(min..max))
}
