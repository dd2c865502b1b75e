//! Minimal InfluxDB line protocol encoding for weather points.

use crate::types::Reading;

/// Encodes one reading as a line protocol record with a millisecond
/// timestamp, one field per channel.
pub(crate) fn reading_line(measurement: &str, reading: &Reading) -> String {
    format!(
        "{} temperature={},humidity={},pressure={},wind_speed={},wind_direction={} {}",
        escape_measurement(measurement),
        reading.temperature,
        reading.humidity,
        reading.pressure,
        reading.wind_speed,
        reading.wind_direction,
        reading.timestamp.timestamp_millis(),
    )
}

/// Measurement names must escape commas and spaces in line protocol.
fn escape_measurement(name: &str) -> String {
    name.replace(',', "\\,").replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn reading() -> Reading {
        Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            temperature: 31.4,
            humidity: 58.0,
            pressure: 1004.2,
            wind_speed: 7.6,
            wind_direction: 184.0,
        }
    }

    #[test]
    fn encodes_all_channels_with_source_timestamp() {
        let line = reading_line("weather_live", &reading());
        assert_eq!(
            line,
            "weather_live temperature=31.4,humidity=58,pressure=1004.2,\
             wind_speed=7.6,wind_direction=184 1714564800000"
        );
    }

    #[test]
    fn escapes_measurement_separators() {
        let line = reading_line("my series,v2", &reading());
        assert!(line.starts_with("my\\ series\\,v2 "));
    }
}
