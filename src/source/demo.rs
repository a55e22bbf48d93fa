use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Field, RawRow};

const CLIENT_COUNT: usize = 61;
const SQUADS: [&str; 2] = ["Templários", "Spartans"];

/// Status text paired with its cumulative probability.
const STATUS_WEIGHTS: [(&str, f64); 5] = [
    ("Safe", 0.48),
    ("Care", 0.73),
    ("Danger", 0.93),
    ("Aviso Prévio", 0.98),
    ("Implementação", 1.0),
];

/// Generate a sample portfolio. The same `seed` always yields the same rows.
pub fn generate_rows(seed: Option<u64>) -> Vec<RawRow> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (1..=CLIENT_COUNT)
        .map(|i| {
            let squad = if rng.gen::<f64>() > 0.55 {
                SQUADS[0]
            } else {
                SQUADS[1]
            };

            let roll = rng.gen::<f64>();
            let status = STATUS_WEIGHTS
                .iter()
                .find(|(_, cumulative)| roll <= *cumulative)
                .map(|(label, _)| *label)
                .unwrap_or("Safe");

            let fee = if squad == SQUADS[0] {
                rng.gen_range(3000..=8000)
            } else {
                rng.gen_range(2000..=6000)
            };
            let lifetime = rng.gen_range(3..=15);

            RawRow::new()
                .with_number(Field::Id, i as f64)
                .with_text(Field::Name, format!("Cliente {}", i))
                .with_text(Field::Group, squad)
                .with_number(Field::Fee, fee as f64)
                .with_number(Field::Lifetime, lifetime as f64)
                .with_text(Field::Status, status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::record::normalize_batch;

    #[test]
    fn test_seeded_output_is_reproducible() {
        assert_eq!(generate_rows(Some(7)), generate_rows(Some(7)));
    }

    #[test]
    fn test_generated_values_in_range() {
        let records = normalize_batch(&generate_rows(Some(42)), "Indefinido");
        assert_eq!(records.len(), CLIENT_COUNT);

        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i as i64 + 1);
            assert!(SQUADS.contains(&record.group.as_str()));
            assert!((3.0..=15.0).contains(&record.lifetime_months));
            if record.group == "Templários" {
                assert!((3000.0..=8000.0).contains(&record.fee));
            } else {
                assert!((2000.0..=6000.0).contains(&record.fee));
            }
        }
    }
}
