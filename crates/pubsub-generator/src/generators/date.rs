//! Date value generators.

use chrono::NaiveDate;
use pubsub_core::Value;
use rand::Rng;

/// Generate a random date between two days of the same month (inclusive).
pub fn generate_day_of_month<R: Rng>(
    rng: &mut R,
    year: i32,
    month: u32,
    first_day: u32,
    last_day: u32,
) -> Option<Value> {
    if first_day > last_day {
        return None;
    }
    let day = rng.gen_range(first_day..=last_day);
    NaiveDate::from_ymd_opt(year, month, day).map(Value::Date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_day_of_month() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            match generate_day_of_month(&mut rng, 2023, 2, 1, 28) {
                Some(Value::Date(date)) => {
                    assert_eq!(date.year(), 2023);
                    assert_eq!(date.month(), 2);
                    assert!((1..=28).contains(&date.day()));
                }
                other => panic!("Expected Date value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_day_range() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_day_of_month(&mut rng, 2023, 2, 10, 5), None);
        assert_eq!(generate_day_of_month(&mut rng, 2023, 2, 30, 30), None);
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(
            generate_day_of_month(&mut rng1, 2023, 2, 1, 28),
            generate_day_of_month(&mut rng2, 2023, 2, 1, 28)
        );
    }
}
