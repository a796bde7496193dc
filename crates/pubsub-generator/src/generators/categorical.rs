//! Enumerated value generator.

use pubsub_core::Value;
use rand::Rng;

/// Pick one value uniformly. `None` if there is nothing to pick from.
pub fn generate_one_of<R: Rng>(rng: &mut R, values: &[String]) -> Option<Value> {
    if values.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..values.len());
    Some(Value::Text(values[idx].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generate_one_of_covers_all_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<String> = ["N", "E", "S", "W"].iter().map(|s| s.to_string()).collect();

        let mut seen = HashSet::new();
        for _ in 0..200 {
            match generate_one_of(&mut rng, &values) {
                Some(Value::Text(v)) => {
                    assert!(values.contains(&v));
                    seen.insert(v);
                }
                other => panic!("Expected Text value, got {other:?}"),
            }
        }
        assert_eq!(seen.len(), values.len());
    }

    #[test]
    fn test_generate_one_of_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_one_of(&mut rng, &[]), None);
    }
}
