use crate::models::{ClientRecord, Field, RawRow, RawValue};
use crate::normalize::numeric::{parse_currency, parse_decimal, parse_integer};
use crate::normalize::status::derive_status;

/// Squad used when neither the row nor the caller provides one.
pub const DEFAULT_GROUP: &str = "Indefinido";

/// Build a [`ClientRecord`] from a raw row. Never fails: anything missing or unreadable
/// falls back to a default (position-based id and name, `default_group`, zero amounts,
/// `Safe` status).
///
/// `position` is the 1-based position of the row in its batch.
pub fn normalize(row: &RawRow, position: usize, default_group: &str) -> ClientRecord {
    let id = row.get(Field::Id).and_then(parse_id).unwrap_or(position as i64);

    let name = text_value(row.get(Field::Name)).unwrap_or_else(|| format!("Cliente {}", position));

    let group = text_value(row.get(Field::Group)).unwrap_or_else(|| default_group.to_string());

    let fee = match row.get(Field::Fee) {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => parse_currency(s).unwrap_or(0.0),
        None => 0.0,
    };

    let lifetime_months = match row.get(Field::Lifetime) {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => parse_decimal(s).unwrap_or(0.0),
        None => 0.0,
    };

    let status = match row.get(Field::Status) {
        Some(RawValue::Text(s)) => derive_status(s),
        Some(RawValue::Number(n)) => derive_status(&n.to_string()),
        None => derive_status(""),
    };

    ClientRecord {
        id,
        name,
        group,
        fee,
        lifetime_months,
        status,
    }
}

/// Normalize a whole batch, numbering rows from 1.
pub fn normalize_batch(rows: &[RawRow], default_group: &str) -> Vec<ClientRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize(row, i + 1, default_group))
        .collect()
}

// A zero id is treated like a missing one; sheets use 0 as a "no id yet" placeholder.
fn parse_id(value: &RawValue) -> Option<i64> {
    let id = match value {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        RawValue::Number(n)
            if n.is_finite()
                && n.fract() == 0.0
                && *n >= i64::MIN as f64
                && *n < i64::MAX as f64 =>
        {
            Some(*n as i64)
        }
        RawValue::Number(_) => None,
        RawValue::Text(s) => parse_integer(s),
    };
    id.filter(|id| *id != 0)
}

fn text_value(value: Option<&RawValue>) -> Option<String> {
    match value? {
        RawValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
        RawValue::Text(_) => None,
        RawValue::Number(n) => Some(n.to_string()),
    }
}
