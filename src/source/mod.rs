mod error;
mod open_meteo;

pub use error::SourceError;
pub use open_meteo::OpenMeteoClient;

#[cfg(test)]
pub(crate) use open_meteo::parse_payload;

use crate::types::{LatLon, Reading};
use async_trait::async_trait;

/// A remote provider of point-in-time weather readings.
///
/// The collector is generic over this trait so it can be driven by a fake
/// source in tests instead of a live HTTP endpoint.
#[async_trait]
pub trait WeatherSource {
    /// Fetches the current reading at the given coordinate.
    async fn current(&self, location: LatLon) -> Result<Reading, SourceError>;
}
