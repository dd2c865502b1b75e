mod error;
mod influx;
mod line_protocol;

pub use error::StoreError;
pub use influx::InfluxStore;

use crate::types::Reading;
use async_trait::async_trait;
use polars::prelude::DataFrame;

/// Series name live readings are written under and read back from.
pub const DEFAULT_MEASUREMENT: &str = "weather_live";

/// Connection settings for an InfluxDB 2.x instance.
///
/// Passed in explicitly at construction; the library never reads ambient
/// environment state (the `collect` binary does that translation).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL, e.g. `http://localhost:8086`.
    pub url: String,
    /// API token with write access to the bucket.
    pub token: String,
    pub org: String,
    pub bucket: String,
}

/// Append-only write access to the time-series store.
#[async_trait]
pub trait StoreWriter {
    /// Writes one reading under the given measurement, timestamped with the
    /// reading's source-reported instant. Returns once the store has
    /// acknowledged the point.
    async fn write_reading(&self, measurement: &str, reading: &Reading)
        -> Result<(), StoreError>;
}

/// Read access to the accumulated series, the preprocessor's data-loader
/// collaborator.
#[async_trait]
pub trait SeriesLoader {
    /// Loads all points from the trailing `days` window as a DataFrame with a
    /// `time` column plus one column per stored field. Row order is whatever
    /// the store returns; an empty window yields an empty frame.
    async fn load_series(&self, days: u32) -> Result<DataFrame, StoreError>;
}
