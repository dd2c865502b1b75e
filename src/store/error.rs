use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("store request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse query response CSV")]
    Csv(#[from] PolarsError),
}
