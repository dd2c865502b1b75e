use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("weather API request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected weather payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unparseable source timestamp '{value}'")]
    Timestamp { value: String },
}
