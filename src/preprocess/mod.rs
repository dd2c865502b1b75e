//! Turns a ragged, irregularly-sampled series from the store into a clean,
//! fixed-cadence, gap-free matrix ready for numeric modeling.

mod error;
mod impute;
mod interval;
mod resample;

pub use error::PreprocessError;

use crate::store::SeriesLoader;
use bon::bon;
use chrono::{DateTime, Utc};
use log::info;
use polars::prelude::*;
use self::resample::{Channel, SampledGrid};

/// Minimum number of clean rows the downstream model window needs.
pub const MIN_WINDOW_ROWS: usize = 12;

const TIME_COLUMN: &str = "time";
const REQUIRED_CHANNELS: [&str; 2] = ["temperature", "humidity"];
const AUX_CHANNELS: [&str; 3] = ["pressure", "wind_speed", "wind_direction"];

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_INTERVAL: &str = "5min";

/// Builds clean model-ready windows from the raw series behind a
/// [`SeriesLoader`].
///
/// Holds no mutable state of its own: every call constructs and discards its
/// own series, so concurrent invocations are safe and identical store content
/// yields identical matrices.
pub struct Preprocessor<L> {
    loader: L,
}

impl<L> Preprocessor<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

#[bon]
impl<L> Preprocessor<L>
where
    L: SeriesLoader + Sync,
{
    /// Loads the trailing window and cleans it into a fixed-interval matrix.
    ///
    /// The pipeline runs in strict sequence, short-circuiting on the first
    /// failure: load, schema check, sort by source timestamp, resample to
    /// mean-aggregated buckets, impute interior gaps by time-weighted linear
    /// interpolation, trim unfillable edges, and verify the result is big
    /// enough for the model window.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.days(Option<u32>)`: Optional. Lookback window in days, defaults to 7.
    ///   Zero is rejected as a configuration error.
    /// * `.interval(Option<&str>)`: Optional. Grid interval, defaults to `"5min"`.
    ///
    /// # Returns
    ///
    /// A `DataFrame` whose `time` column is strictly ascending and equally
    /// spaced by the interval, with no missing temperature or humidity cells
    /// and at least [`MIN_WINDOW_ROWS`] rows. Auxiliary channels present in
    /// the store (pressure, wind) are carried along and may contain nulls.
    ///
    /// # Errors
    ///
    /// [`PreprocessError::Configuration`] for invalid parameters,
    /// [`PreprocessError::NoData`] when the window is empty,
    /// [`PreprocessError::Schema`] when required columns are absent, and
    /// [`PreprocessError::InsufficientData`] when fewer than
    /// [`MIN_WINDOW_ROWS`] rows survive cleaning.
    #[builder]
    pub async fn build_clean_window(
        &self,
        days: Option<u32>,
        interval: Option<&str>,
    ) -> Result<DataFrame, PreprocessError> {
        let days = days.unwrap_or(DEFAULT_DAYS);
        let interval = interval.unwrap_or(DEFAULT_INTERVAL);
        if days == 0 {
            return Err(PreprocessError::Configuration(
                "lookback days must be positive".to_string(),
            ));
        }
        let step_ms = interval::parse_interval(interval)?;

        let frame = self
            .loader
            .load_series(days)
            .await
            .map_err(PreprocessError::Load)?;
        if frame.height() == 0 {
            return Err(PreprocessError::NoData);
        }
        check_schema(&frame)?;

        let (times_ms, channels) = normalize(&frame)?;
        let SampledGrid {
            times_ms,
            mut channels,
        } = resample::resample(&times_ms, &channels, step_ms);

        for channel in channels.iter_mut().filter(|c| c.required) {
            impute::interpolate_by_time(&times_ms, &mut channel.cells);
        }

        let (times_ms, channels) = trim(times_ms, channels);
        if times_ms.len() < MIN_WINDOW_ROWS {
            return Err(PreprocessError::InsufficientData {
                required: MIN_WINDOW_ROWS,
                got: times_ms.len(),
            });
        }

        info!(
            "Built clean window: {} rows at {} over {} day(s)",
            times_ms.len(),
            interval,
            days
        );
        to_frame(times_ms, channels)
    }
}

/// The series must expose at least {time, temperature, humidity}.
fn check_schema(frame: &DataFrame) -> Result<(), PreprocessError> {
    let present: Vec<String> = frame
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    let missing: Vec<String> = [TIME_COLUMN]
        .iter()
        .chain(REQUIRED_CHANNELS.iter())
        .filter(|required| !present.iter().any(|p| p == **required))
        .map(|required| required.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PreprocessError::Schema { missing, present })
    }
}

/// Parses timestamps, gathers the numeric channels, and sorts everything
/// ascending by time. Input row order is not trusted.
fn normalize(frame: &DataFrame) -> Result<(Vec<i64>, Vec<Channel>), PreprocessError> {
    let raw_times = time_column_ms(frame)?;

    let mut channels = Vec::new();
    for name in REQUIRED_CHANNELS {
        channels.push(Channel {
            name: name.to_string(),
            required: true,
            cells: column_as_f64(frame, name)?,
        });
    }
    for name in AUX_CHANNELS {
        if frame.get_column_names_str().contains(&name) {
            channels.push(Channel {
                name: name.to_string(),
                required: false,
                cells: column_as_f64(frame, name)?,
            });
        }
    }

    let mut order: Vec<usize> = (0..raw_times.len()).collect();
    order.sort_by_key(|&i| raw_times[i]);
    let times = order.iter().map(|&i| raw_times[i]).collect();
    for channel in &mut channels {
        channel.cells = order.iter().map(|&i| channel.cells[i]).collect();
    }
    Ok((times, channels))
}

/// Converts the `time` column to epoch milliseconds, whether the loader
/// produced RFC 3339 strings (CSV path) or a native datetime column.
fn time_column_ms(frame: &DataFrame) -> Result<Vec<i64>, PreprocessError> {
    let column = frame.column(TIME_COLUMN)?;
    match column.dtype() {
        DataType::Datetime(unit, _) => {
            let divisor = match unit {
                TimeUnit::Nanoseconds => 1_000_000,
                TimeUnit::Microseconds => 1_000,
                TimeUnit::Milliseconds => 1,
            };
            let cast = column.as_materialized_series().cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|value| {
                    value.map(|v| v / divisor).ok_or_else(|| {
                        PreprocessError::Timestamp {
                            value: "null".to_string(),
                        }
                    })
                })
                .collect()
        }
        DataType::String => column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| {
                let value = value.ok_or_else(|| PreprocessError::Timestamp {
                    value: "null".to_string(),
                })?;
                DateTime::parse_from_rfc3339(value)
                    .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
                    .map_err(|_| PreprocessError::Timestamp {
                        value: value.to_string(),
                    })
            })
            .collect(),
        other => Err(PreprocessError::Timestamp {
            value: format!("time column has dtype {other}"),
        }),
    }
}

fn column_as_f64(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PreprocessError> {
    let cast = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Drops every row still missing a required-channel cell. After imputation
/// only leading and trailing edge gaps can remain, so this trims the edges
/// without touching interior rows.
fn trim(times_ms: Vec<i64>, channels: Vec<Channel>) -> (Vec<i64>, Vec<Channel>) {
    let keep: Vec<bool> = (0..times_ms.len())
        .map(|row| {
            channels
                .iter()
                .filter(|c| c.required)
                .all(|c| c.cells[row].is_some())
        })
        .collect();

    let times = times_ms
        .into_iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(t, _)| t)
        .collect();
    let channels = channels
        .into_iter()
        .map(|channel| {
            let Channel {
                name,
                required,
                cells,
            } = channel;
            let cells = cells
                .into_iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|(cell, _)| cell)
                .collect();
            Channel {
                name,
                required,
                cells,
            }
        })
        .collect();
    (times, channels)
}

fn to_frame(times_ms: Vec<i64>, channels: Vec<Channel>) -> Result<DataFrame, PreprocessError> {
    let time = Series::new(TIME_COLUMN.into(), times_ms)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let mut columns = vec![time.into_column()];
    for channel in channels {
        columns.push(Series::new(channel.name.as_str().into(), channel.cells).into_column());
    }
    DataFrame::new(columns).map_err(PreprocessError::from)
}
