//! Operator choice for subscription conditions.

use pubsub_core::domain::CITY;
use pubsub_core::Operator;
use rand::Rng;

/// Choose the operator for a condition on `field`.
///
/// City uses `=` with probability `equality_ratio` percent and otherwise
/// one of the four inequalities uniformly. Every other field picks
/// uniformly among all five operators.
pub fn choose_operator<R: Rng>(rng: &mut R, field: &str, equality_ratio: u32) -> Operator {
    if field == CITY {
        if rng.gen_range(0..100) < equality_ratio {
            Operator::Eq
        } else {
            Operator::INEQUALITIES[rng.gen_range(0..Operator::INEQUALITIES.len())]
        }
    } else {
        Operator::ALL[rng.gen_range(0..Operator::ALL.len())]
    }
}
