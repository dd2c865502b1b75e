use crate::store::StoreError;
use polars::error::PolarsError;
use thiserror::Error;

/// Failure of one stage of the window-cleaning pipeline. Never recovered
/// internally: the first failing stage aborts the call and surfaces here.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Invalid `days` or `interval` parameter; rejected fail-fast before any
    /// store access.
    #[error("invalid preprocessing parameter: {0}")]
    Configuration(String),

    #[error("failed to load series from the store")]
    Load(#[source] StoreError),

    #[error("no weather data available from the store")]
    NoData,

    #[error("missing required columns {missing:?}, present: {present:?}")]
    Schema {
        missing: Vec<String>,
        present: Vec<String>,
    },

    #[error("unparseable timestamp '{value}' in series")]
    Timestamp { value: String },

    #[error("not enough data points after cleaning: need at least {required} rows, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("failed processing series frame: {0}")]
    Frame(#[from] PolarsError),
}
