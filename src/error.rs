use thiserror::Error;

use crate::models::DataSource;

/// Why a data source could not deliver rows.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{source_name} is not configured (missing {missing})")]
    NotConfigured {
        source_name: DataSource,
        missing: &'static str,
    },

    #[error("{source_name} responded with HTTP {status}")]
    Status {
        source_name: DataSource,
        status: reqwest::StatusCode,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
