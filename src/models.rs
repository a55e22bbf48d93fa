use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::normalize::record::DEFAULT_GROUP;

/// One normalized client row. Built by [`crate::normalize::record::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "squad")]
    pub group: String,
    pub fee: f64,
    #[serde(rename = "lt")]
    pub lifetime_months: f64,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Safe,
    Care,
    Danger,
    #[serde(rename = "Aviso Prévio")]
    NoticePending,
    #[serde(rename = "Implementação")]
    InImplementation,
}

impl Status {
    /// Every status in dashboard display order.
    pub const ALL: [Status; 5] = [
        Status::Safe,
        Status::Care,
        Status::Danger,
        Status::NoticePending,
        Status::InImplementation,
    ];

    /// Hex color used by the charts and the PDF badges.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Status::Safe => (0x3C, 0xDC, 0x86),
            Status::Care => (0xFF, 0xAB, 0x2D),
            Status::Danger => (0xFF, 0x5C, 0x5C),
            Status::NoticePending => (0xFF, 0xD1, 0x66),
            Status::InImplementation => (0x7A, 0x6A, 0xF7),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Safe => write!(f, "Safe"),
            Status::Care => write!(f, "Care"),
            Status::Danger => write!(f, "Danger"),
            Status::NoticePending => write!(f, "Aviso Prévio"),
            Status::InImplementation => write!(f, "Implementação"),
        }
    }
}

/// Aggregates over a batch of [`ClientRecord`]s. See [`crate::aggregate::summarize`].
///
/// Status and group maps only carry keys that occur in the batch; absence means zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_count: usize,
    pub total_fee: f64,
    pub average_lifetime: f64,
    pub average_ticket: f64,
    pub counts_by_status: BTreeMap<Status, usize>,
    pub count_by_group: BTreeMap<String, usize>,
    pub sum_fee_by_group: BTreeMap<String, f64>,
    pub avg_lifetime_by_group: BTreeMap<String, f64>,
    pub avg_ticket_by_group: BTreeMap<String, f64>,
}

impl SummaryStats {
    pub fn status_count(&self, status: Status) -> usize {
        self.counts_by_status.get(&status).copied().unwrap_or(0)
    }
}

/// The columns a source row can carry, independent of how the source names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Group,
    Fee,
    Lifetime,
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// A source row before normalization: NocoDB JSON, a CSV line or a generated demo row
/// all land here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    values: HashMap<Field, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: RawValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_text(self, field: Field, text: impl Into<String>) -> Self {
        self.with(field, RawValue::Text(text.into()))
    }

    pub fn with_number(self, field: Field, number: f64) -> Self {
        self.with(field, RawValue::Number(number))
    }

    pub fn set(&mut self, field: Field, value: RawValue) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        self.values.get(&field)
    }
}

/// Where a batch of rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    #[serde(rename = "NocoDB")]
    NocoDb,
    #[serde(rename = "Google Sheets")]
    GoogleSheets,
    Demo,
}

impl DataSource {
    /// Squad assigned to rows that leave the group column empty.
    pub fn default_group(&self) -> &'static str {
        match self {
            DataSource::NocoDb => DEFAULT_GROUP,
            DataSource::GoogleSheets => "Outros",
            DataSource::Demo => DEFAULT_GROUP,
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::NocoDb => write!(f, "NocoDB"),
            DataSource::GoogleSheets => write!(f, "Google Sheets"),
            DataSource::Demo => write!(f, "Demo"),
        }
    }
}

/// Raw rows plus the source that produced them.
#[derive(Debug, Clone)]
pub struct Batch {
    pub source: DataSource,
    pub rows: Vec<RawRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_json_matches_display() {
        for source in [DataSource::NocoDb, DataSource::GoogleSheets, DataSource::Demo] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source));
        }
    }
}
