use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::{ColumnMap, NocoDbConfig};
use crate::error::{SourceError, SourceResult};
use crate::models::{DataSource, Field, RawRow, RawValue};

/// Pages requested at the same time once the first page reported the row count.
const CONCURRENT_PAGES: usize = 4;

#[derive(Debug, Deserialize)]
struct RecordsPage {
    #[serde(default)]
    list: Vec<Map<String, Value>>,
    #[serde(rename = "pageInfo", default)]
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_rows: Option<u64>,
}

/// Fetch every record of the configured NocoDB table.
///
/// The first page tells how many rows exist; the rest are fetched in concurrent
/// batches of [`CONCURRENT_PAGES`].
pub async fn fetch_rows(
    client: &Client,
    config: &NocoDbConfig,
    quiet: bool,
) -> SourceResult<Vec<RawRow>> {
    let base = required(config.url.as_deref(), "url")?;
    let api_key = required(config.api_key.as_deref(), "api_key")?;
    let table_id = required(config.table_id.as_deref(), "table_id")?;
    let page_size = config.page_size.max(1);
    let endpoint = records_url(base, table_id);

    let first = fetch_page(client, &endpoint, api_key, page_size, 0).await?;
    let total = first
        .page_info
        .as_ref()
        .and_then(|p| p.total_rows)
        .unwrap_or(0) as usize;
    let mut records = first.list;

    let offsets = remaining_offsets(records.len(), total);
    log::debug!(
        "NocoDB table {table_id}: {total} rows, {} more page(s) to fetch",
        offsets.len()
    );

    if !offsets.is_empty() {
        let pb = if !quiet {
            let pb = ProgressBar::new(offsets.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for batch in offsets.chunks(CONCURRENT_PAGES) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&offset| fetch_page(client, &endpoint, api_key, page_size, offset))
                .collect();

            for page in join_all(futures).await {
                records.extend(page?.list);
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    }

    Ok(records
        .iter()
        .map(|record| map_record(record, &config.columns))
        .collect())
}

async fn fetch_page(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    limit: usize,
    offset: usize,
) -> SourceResult<RecordsPage> {
    log::debug!("GET {endpoint}?limit={limit}&offset={offset}");

    let response = client
        .get(endpoint)
        .query(&[("limit", limit), ("offset", offset)])
        .header("Accept", "application/json")
        .bearer_auth(api_key)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: DataSource::NocoDb,
            status,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Offsets of the pages still to fetch after a first page of `fetched` rows.
///
/// NocoDB caps `limit` server-side, so pages advance by what the first page actually
/// returned rather than by the requested page size.
fn remaining_offsets(fetched: usize, total: usize) -> Vec<usize> {
    if fetched == 0 {
        return Vec::new();
    }
    (fetched..total).step_by(fetched).collect()
}

fn required<'a>(value: Option<&'a str>, missing: &'static str) -> SourceResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(SourceError::NotConfigured {
            source_name: DataSource::NocoDb,
            missing,
        })
}

fn records_url(base: &str, table_id: &str) -> String {
    format!(
        "{}/api/v2/tables/{}/records",
        base.trim_end_matches('/'),
        table_id
    )
}

/// Pick the configured columns out of one NocoDB record. Numbers and strings are kept;
/// nulls, booleans and nested values count as missing.
fn map_record(record: &Map<String, Value>, columns: &ColumnMap) -> RawRow {
    let mut row = RawRow::new();
    let mapping = [
        (Field::Id, &columns.id),
        (Field::Name, &columns.name),
        (Field::Group, &columns.group),
        (Field::Fee, &columns.fee),
        (Field::Lifetime, &columns.lifetime),
        (Field::Status, &columns.status),
    ];

    for (field, column) in mapping {
        let value = match record.get(column.as_str()) {
            Some(Value::Number(n)) => n.as_f64().map(RawValue::Number),
            Some(Value::String(s)) => Some(RawValue::Text(s.clone())),
            _ => None,
        };
        if let Some(value) = value {
            row.set(field, value);
        }
    }

    row
}
