//! Renderers for the dashboard and client listings.
//!
//! - [`terminal`]: summary box and colored tables; respects `--quiet`.
//! - [`pdf`]: cover with metric cards, status and squad breakdown, client table.
//! - [`chart`]: PNG with the status pie and fee-by-squad bars.

pub mod chart;
pub mod pdf;
pub mod terminal;

use serde::Serialize;

use crate::models::{DataSource, SummaryStats};

/// Everything a dashboard renderer needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub source: DataSource,
    pub squad: &'a str,
    pub generated_at: String,
    pub stats: &'a SummaryStats,
}

/// Format an amount as Brazilian reais, e.g. `R$ 3.500,75`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

pub fn format_months(value: f64) -> String {
    format!("{:.1} months", value)
}

/// Share of `part` in `total` as a percentage; 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(3500.75), "R$ 3.500,75");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1234567.5), "R$ 1.234.567,50");
        assert_eq!(format_brl(-42.1), "-R$ 42,10");
    }

    #[test]
    fn test_format_months() {
        assert_eq!(format_months(7.0 / 3.0), "2.3 months");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
    }
}
