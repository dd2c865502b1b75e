mod error;

pub use error::CollectError;

use crate::source::WeatherSource;
use crate::store::{StoreWriter, DEFAULT_MEASUREMENT};
use crate::types::LatLon;
use bon::bon;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_PERIOD: Duration = Duration::from_secs(300);

/// Samples one live reading per period and appends it to the store,
/// indefinitely.
///
/// The loop is fault-tolerant by construction: every failure (network,
/// payload, store write) is terminal to that cycle only. Nothing is carried
/// between cycles, there is no backoff and no deduplication; the next tick is
/// the retry. The only controlled exit is the cancellation token, checked at
/// each cycle boundary.
pub struct Collector<S, W> {
    source: S,
    store: W,
    location: LatLon,
    period: Duration,
    measurement: String,
}

#[bon]
impl<S, W> Collector<S, W>
where
    S: WeatherSource + Send + Sync,
    W: StoreWriter + Send + Sync,
{
    /// Builds a collector.
    ///
    /// # Arguments
    ///
    /// * `.source(S)`: **Required.** The live weather source.
    /// * `.store(W)`: **Required.** The store to append readings to.
    /// * `.location(LatLon)`: **Required.** Fixed coordinate to sample.
    /// * `.period(Option<Duration>)`: Optional. Sampling period, defaults to 300 s.
    /// * `.measurement(Option<String>)`: Optional. Series name, defaults to `weather_live`.
    #[builder]
    pub fn new(
        source: S,
        store: W,
        location: LatLon,
        period: Option<Duration>,
        measurement: Option<String>,
    ) -> Self {
        Self {
            source,
            store,
            location,
            period: period.unwrap_or(DEFAULT_PERIOD),
            measurement: measurement.unwrap_or_else(|| DEFAULT_MEASUREMENT.to_string()),
        }
    }

    /// Runs the sampling loop until `stop` is cancelled.
    ///
    /// Fixed-period scheduling: the full period is slept after each cycle
    /// regardless of how long the cycle took, so cycle duration adds to the
    /// total period.
    pub async fn run(&self, stop: CancellationToken) {
        info!(
            "Sampling '{}' at {} every {:?}",
            self.measurement, self.location, self.period
        );
        loop {
            match self.cycle().await {
                Ok(written) => info!("Wrote '{}' point at {}", self.measurement, written),
                Err(e) => warn!("Collection cycle failed, retrying next tick: {}", e),
            }

            tokio::select! {
                _ = stop.cancelled() => {
                    info!("Stop requested, collector exiting");
                    break;
                }
                _ = tokio::time::sleep(self.period) => {}
            }
        }
    }

    /// One fetch-then-write cycle. The write happens-after a successful
    /// parse and carries the source-reported timestamp, which is returned as
    /// the confirmation marker.
    async fn cycle(&self) -> Result<DateTime<Utc>, CollectError> {
        let reading = self.source.current(self.location).await?;
        self.store.write_reading(&self.measurement, &reading).await?;
        Ok(reading.timestamp)
    }
}
