use crate::source::error::SourceError;
use crate::source::WeatherSource;
use crate::types::{LatLon, Reading};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::info;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,pressure_msl,wind_speed_10m,wind_direction_10m";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The `current` block of an Open-Meteo forecast response.
///
/// Every field is mandatory: deserialization fails naming the missing field
/// when the API drops one, which the collector treats as a parse failure for
/// that cycle.
#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    pressure_msl: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

/// Client for the Open-Meteo forecast API (<https://open-meteo.com>).
///
/// Issues one bounded-timeout GET per [`WeatherSource::current`] call and
/// parses the `current` observation block into a [`Reading`]. No API key is
/// required by the service.
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Creates a client with the default 10 second request timeout.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self {
            client,
            base_url: FORECAST_URL.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn current(&self, location: LatLon) -> Result<Reading, SourceError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current={}",
            self.base_url, location.0, location.1, CURRENT_FIELDS
        );
        info!("Fetching current weather from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(url.clone(), e))?;

        let response = response.error_for_status().map_err(|e| {
            if let Some(status) = e.status() {
                SourceError::HttpStatus {
                    url: url.clone(),
                    status,
                    source: e,
                }
            } else {
                SourceError::Network(url.clone(), e)
            }
        })?;

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(url, e))?;
        parse_payload(&body)
    }
}

/// Parses a forecast response body into a [`Reading`].
///
/// Field extraction is by name; any absent field is a payload error, and the
/// reading carries the source-reported observation time.
pub(crate) fn parse_payload(body: &str) -> Result<Reading, SourceError> {
    let payload: ForecastResponse = serde_json::from_str(body)?;
    let current = payload.current;
    let timestamp = parse_source_time(&current.time)?;
    Ok(Reading {
        timestamp,
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        pressure: current.pressure_msl,
        wind_speed: current.wind_speed_10m,
        wind_direction: current.wind_direction_10m,
    })
}

/// Open-Meteo reports observation times as ISO 8601 without an offset
/// (`2024-05-01T12:00`, UTC by default), occasionally with seconds. Accept
/// RFC 3339 too in case a proxy normalizes the format.
fn parse_source_time(value: &str) -> Result<DateTime<Utc>, SourceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(SourceError::Timestamp {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FULL_PAYLOAD: &str = r#"{
        "latitude": 23.97,
        "longitude": 90.32,
        "current_units": { "temperature_2m": "°C" },
        "current": {
            "time": "2024-05-01T12:00",
            "interval": 900,
            "temperature_2m": 31.4,
            "relative_humidity_2m": 58.0,
            "pressure_msl": 1004.2,
            "wind_speed_10m": 7.6,
            "wind_direction_10m": 184.0
        }
    }"#;

    #[test]
    fn parses_full_payload_with_source_time() {
        let reading = parse_payload(FULL_PAYLOAD).unwrap();
        assert_eq!(
            reading.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(reading.temperature, 31.4);
        assert_eq!(reading.humidity, 58.0);
        assert_eq!(reading.pressure, 1004.2);
        assert_eq!(reading.wind_speed, 7.6);
        assert_eq!(reading.wind_direction, 184.0);
    }

    #[test]
    fn missing_field_is_a_payload_error_naming_the_field() {
        let body = r#"{
            "current": {
                "time": "2024-05-01T12:00",
                "relative_humidity_2m": 58.0,
                "pressure_msl": 1004.2,
                "wind_speed_10m": 7.6,
                "wind_direction_10m": 184.0
            }
        }"#;
        let err = parse_payload(body).unwrap_err();
        assert!(matches!(err, SourceError::Payload(_)));
        assert!(err.to_string().contains("temperature_2m"));
    }

    #[test]
    fn missing_current_block_is_a_payload_error() {
        let err = parse_payload(r#"{"latitude": 23.97}"#).unwrap_err();
        assert!(matches!(err, SourceError::Payload(_)));
    }

    #[test]
    fn unparseable_time_is_a_timestamp_error() {
        let body = FULL_PAYLOAD.replace("2024-05-01T12:00", "last tuesday");
        let err = parse_payload(&body).unwrap_err();
        assert!(matches!(err, SourceError::Timestamp { .. }));
        assert!(err.to_string().contains("last tuesday"));
    }

    #[test]
    fn accepts_rfc3339_and_seconds_precision_times() {
        for time in ["2024-05-01T12:00:00Z", "2024-05-01T12:00:00"] {
            let body = FULL_PAYLOAD.replace("2024-05-01T12:00", time);
            let reading = parse_payload(&body).unwrap();
            assert_eq!(
                reading.timestamp,
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            );
        }
    }
}
