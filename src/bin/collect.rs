//! Samples live weather into InfluxDB until interrupted.
//!
//! Connection settings come from the environment (or a `.env` file):
//! `INFLUX_URL`, `INFLUX_TOKEN`, `INFLUX_ORG`, `INFLUX_BUCKET`.

use anyhow::Context;
use meteoflux::{Collector, InfluxStore, LatLon, OpenMeteoClient, StoreConfig};
use tokio_util::sync::CancellationToken;

const LOCATION: LatLon = LatLon(23.97, 90.32);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = StoreConfig {
        url: env_var("INFLUX_URL")?,
        token: env_var("INFLUX_TOKEN")?,
        org: env_var("INFLUX_ORG")?,
        bucket: env_var("INFLUX_BUCKET")?,
    };

    let collector = Collector::builder()
        .source(OpenMeteoClient::new()?)
        .store(InfluxStore::new(config))
        .location(LOCATION)
        .build();

    let stop = CancellationToken::new();
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_stop.cancel();
        }
    });

    collector.run(stop).await;
    Ok(())
}

fn env_var(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("missing environment variable {key}"))
}
