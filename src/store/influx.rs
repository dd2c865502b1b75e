use crate::store::error::StoreError;
use crate::store::line_protocol;
use crate::store::{SeriesLoader, StoreConfig, StoreWriter, DEFAULT_MEASUREMENT};
use crate::types::Reading;
use async_trait::async_trait;
use log::{debug, info};
use polars::prelude::*;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::io::Cursor;

/// Columns worth keeping from a pivoted Flux result; everything else is Flux
/// bookkeeping (`result`, `table`, `_start`, ...).
const KEEP_COLUMNS: [&str; 6] = [
    "_time",
    "temperature",
    "humidity",
    "pressure",
    "wind_speed",
    "wind_direction",
];

/// InfluxDB 2.x client covering both sides of the pipeline's store contract:
/// line protocol writes from the collector and Flux range reads for the
/// preprocessor.
///
/// The client enforces no timeout of its own beyond reqwest's defaults; the
/// store's availability guarantees are its own concern.
pub struct InfluxStore {
    config: StoreConfig,
    client: Client,
    measurement: String,
}

impl InfluxStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            measurement: DEFAULT_MEASUREMENT.to_string(),
        }
    }

    /// Overrides the measurement used for range reads.
    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = measurement.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn check_status(url: String, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::HttpStatus { url, status, body })
    }
}

#[async_trait]
impl StoreWriter for InfluxStore {
    async fn write_reading(
        &self,
        measurement: &str,
        reading: &Reading,
    ) -> Result<(), StoreError> {
        let url = self.endpoint("/api/v2/write");
        let line = line_protocol::reading_line(measurement, reading);
        debug!("Writing point: {}", line);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ms"),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.config.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await
            .map_err(|e| StoreError::Network(url.clone(), e))?;

        Self::check_status(url, response).await?;
        Ok(())
    }
}

#[async_trait]
impl SeriesLoader for InfluxStore {
    async fn load_series(&self, days: u32) -> Result<DataFrame, StoreError> {
        let url = self.endpoint("/api/v2/query");
        let flux = flux_range_query(&self.config.bucket, &self.measurement, days);
        // Annotation-free CSV dialect so the body parses as a plain table.
        let request = serde_json::json!({
            "query": flux,
            "type": "flux",
            "dialect": { "header": true, "annotations": [] },
        });

        let response = self
            .client
            .post(&url)
            .query(&[("org", self.config.org.as_str())])
            .header(AUTHORIZATION, format!("Token {}", self.config.token))
            .header(ACCEPT, "application/csv")
            .json(&request)
            .send()
            .await
            .map_err(|e| StoreError::Network(url.clone(), e))?;

        let response = Self::check_status(url, response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Network(self.endpoint("/api/v2/query"), e))?;

        let frame = frame_from_flux_csv(&body)?;
        info!(
            "Loaded {} rows from measurement '{}' over the last {} days",
            frame.height(),
            self.measurement,
            days
        );
        Ok(frame)
    }
}

/// Builds the Flux query for a trailing window of pivoted readings: one row
/// per point, one column per field.
fn flux_range_query(bucket: &str, measurement: &str, days: u32) -> String {
    format!(
        "from(bucket: \"{bucket}\")\n\
         \x20 |> range(start: -{days}d)\n\
         \x20 |> filter(fn: (r) => r._measurement == \"{measurement}\")\n\
         \x20 |> pivot(rowKey: [\"_time\"], columnKey: [\"_field\"], valueColumn: \"_value\")\n\
         \x20 |> drop(columns: [\"_start\", \"_stop\", \"_measurement\"])"
    )
}

/// Parses a Flux CSV body into a DataFrame with only the `time` column and
/// field columns, dropping the tabular bookkeeping Flux adds. A blank body
/// (no rows in the window) becomes an empty frame.
fn frame_from_flux_csv(body: &[u8]) -> Result<DataFrame, StoreError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(DataFrame::empty());
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(body.to_vec()))
        .finish()?;

    let wanted: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .filter(|name| KEEP_COLUMNS.contains(name))
        .map(str::to_string)
        .collect();
    let mut df = df.select(wanted)?;
    if df.get_column_names_str().contains(&"_time") {
        df.rename("_time", "time".into())?;
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_query_scopes_bucket_measurement_and_window() {
        let flux = flux_range_query("weather", "weather_live", 7);
        assert!(flux.contains("from(bucket: \"weather\")"));
        assert!(flux.contains("range(start: -7d)"));
        assert!(flux.contains("r._measurement == \"weather_live\""));
        assert!(flux.contains("pivot(rowKey: [\"_time\"]"));
    }

    #[test]
    fn csv_body_parses_to_tidy_frame() {
        let body = b"result,table,_time,temperature,humidity\n\
                     ,0,2024-05-01T00:00:00Z,25.4,60.2\n\
                     ,0,2024-05-01T00:05:00Z,25.6,60.8\n";
        let frame = frame_from_flux_csv(body).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(
            frame.get_column_names_str(),
            ["time", "temperature", "humidity"]
        );
    }

    #[test]
    fn blank_body_is_an_empty_frame() {
        let frame = frame_from_flux_csv(b"\r\n").unwrap();
        assert_eq!(frame.height(), 0);
    }

    #[test]
    fn missing_field_columns_are_simply_absent() {
        let body = b"result,table,_time,temperature\n\
                     ,0,2024-05-01T00:00:00Z,25.4\n";
        let frame = frame_from_flux_csv(body).unwrap();
        assert_eq!(frame.get_column_names_str(), ["time", "temperature"]);
    }
}
