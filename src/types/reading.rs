use chrono::{DateTime, Utc};

/// A single weather observation at one instant.
///
/// The timestamp is the one reported by the source for the observation, not
/// the wall-clock time the sample was fetched. Using the source instant keeps
/// stored points free of clock skew and network latency error.
///
/// All channels are required: a payload missing any of them fails to parse
/// into a `Reading` rather than being defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Air temperature at 2 m, °C.
    pub temperature: f64,
    /// Relative humidity at 2 m, percent (0-100).
    pub humidity: f64,
    /// Mean sea-level pressure, hPa.
    pub pressure: f64,
    /// Wind speed at 10 m.
    pub wind_speed: f64,
    /// Wind direction at 10 m, degrees.
    pub wind_direction: f64,
}
