mod collector;
mod error;
mod preprocess;
mod source;
mod store;
mod types;

pub use error::MeteofluxError;

pub use collector::{CollectError, Collector};
pub use preprocess::{PreprocessError, Preprocessor, MIN_WINDOW_ROWS};
pub use source::{OpenMeteoClient, SourceError, WeatherSource};
pub use store::{
    InfluxStore, SeriesLoader, StoreConfig, StoreError, StoreWriter, DEFAULT_MEASUREMENT,
};
pub use types::{LatLon, Reading};
