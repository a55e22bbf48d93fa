use reqwest::Client;

use crate::config::SheetsConfig;
use crate::csv_line::tokenize;
use crate::error::{SourceError, SourceResult};
use crate::models::{DataSource, Field, RawRow};

/// Column order of the exported sheet.
const COLUMNS: [Field; 6] = [
    Field::Id,
    Field::Name,
    Field::Group,
    Field::Fee,
    Field::Lifetime,
    Field::Status,
];

/// Download the sheet as CSV through the public `gviz` export and split it into rows.
pub async fn fetch_rows(client: &Client, config: &SheetsConfig) -> SourceResult<Vec<RawRow>> {
    let spreadsheet_id = config
        .spreadsheet_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(SourceError::NotConfigured {
            source_name: DataSource::GoogleSheets,
            missing: "spreadsheet_id",
        })?;

    let url = export_url(spreadsheet_id);
    log::debug!("GET {url} (sheet {})", config.sheet);

    let response = client
        .get(&url)
        .query(&[("tqx", "out:csv"), ("sheet", config.sheet.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: DataSource::GoogleSheets,
            status,
        });
    }

    let body = response.text().await?;
    Ok(parse_rows(&body))
}

fn export_url(spreadsheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq",
        spreadsheet_id
    )
}

/// Turn a CSV export into raw rows. The first line is the header and is skipped, as are
/// blank lines. Columns are read by position: id, name, squad, fee, lt, status.
pub fn parse_rows(csv: &str) -> Vec<RawRow> {
    csv.split('\n')
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut row = RawRow::new();
            for (field, value) in COLUMNS.iter().zip(tokenize(line)) {
                row = row.with_text(*field, value);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawValue, Status};
    use crate::normalize::record::normalize_batch;

    const EXPORT: &str = "\"id\",\"cliente\",\"squad\",\"fee\",\"lt\",\"status\"\r\n\
\"1\",\"Padaria Central\",\"Templários\",\"R$ 4.200,00\",\"12\",\"🟡 Care\"\r\n\
\r\n\
\"2\",\"Oficina, Peças & Cia\",\"Spartans\",\"3.100,50\",\"7,5\",\"Danger\"\r\n\
\"\",\"\",\"\",\"\",\"\",\"\"\r\n";

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let rows = parse_rows(EXPORT);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1].get(Field::Name),
            Some(&RawValue::Text("Oficina, Peças & Cia".to_string()))
        );
    }

    #[test]
    fn test_rows_normalize_with_sheet_defaults() {
        let rows = parse_rows(EXPORT);
        let records = normalize_batch(&rows, DataSource::GoogleSheets.default_group());

        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].fee, 4200.0);
        assert_eq!(records[0].status, Status::Care);
        assert_eq!(records[1].lifetime_months, 7.5);
        assert_eq!(records[1].fee, 3100.5);
        assert_eq!(records[1].status, Status::Danger);

        assert_eq!(records[2].id, 3);
        assert_eq!(records[2].name, "Cliente 3");
        assert_eq!(records[2].group, "Outros");
        assert_eq!(records[2].fee, 0.0);
    }

    #[test]
    fn test_short_lines_leave_fields_missing() {
        let rows = parse_rows("id,name\n5,Acme\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Field::Group), None);
    }

    #[test]
    fn test_empty_export() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("id,name,squad,fee,lt,status").is_empty());
    }

    #[test]
    fn test_export_url() {
        assert_eq!(
            export_url("1AbC"),
            "https://docs.google.com/spreadsheets/d/1AbC/gviz/tq"
        );
    }
}
