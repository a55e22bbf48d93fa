//! Data sources that produce [`RawRow`](crate::models::RawRow) batches.
//!
//! - [`nocodb`]: paginated NocoDB v2 records API.
//! - [`sheets`]: public Google Sheets CSV export.
//! - [`demo`]: generated sample portfolio, no network.
//!
//! [`fetch_batch`] picks one according to [`SourceChoice`] and, for `Auto`, falls back
//! from NocoDB to Google Sheets.

pub mod demo;
pub mod nocodb;
pub mod sheets;

use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::Client;

use crate::config::{Config, SourceChoice};
use crate::models::{Batch, DataSource};

/// Options that only affect how a fetch is carried out.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    pub quiet: bool,
    pub seed: Option<u64>,
}

pub async fn fetch_batch(
    client: &Client,
    config: &Config,
    choice: SourceChoice,
    opts: FetchOptions,
) -> Result<Batch> {
    let batch = match choice {
        SourceChoice::NocoDb => Batch {
            source: DataSource::NocoDb,
            rows: nocodb::fetch_rows(client, &config.nocodb, opts.quiet).await?,
        },
        SourceChoice::Sheets => Batch {
            source: DataSource::GoogleSheets,
            rows: sheets::fetch_rows(client, &config.sheets).await?,
        },
        SourceChoice::Demo => Batch {
            source: DataSource::Demo,
            rows: demo::generate_rows(opts.seed),
        },
        SourceChoice::Auto => match nocodb::fetch_rows(client, &config.nocodb, opts.quiet).await {
            Ok(rows) => Batch {
                source: DataSource::NocoDb,
                rows,
            },
            Err(err) => {
                log::warn!("NocoDB fetch failed, falling back to Google Sheets: {err}");
                if !opts.quiet {
                    eprintln!(
                        "  {} Could not reach NocoDB ({}). Using Google Sheets as fallback.",
                        "⚠".yellow(),
                        err
                    );
                }
                let rows = sheets::fetch_rows(client, &config.sheets)
                    .await
                    .context("Google Sheets fallback failed")?;
                Batch {
                    source: DataSource::GoogleSheets,
                    rows,
                }
            }
        },
    };

    log::info!("fetched {} rows from {}", batch.rows.len(), batch.source);
    Ok(batch)
}
