use crate::source::SourceError;
use crate::store::StoreError;
use thiserror::Error;

/// Failure of a single collection cycle. Never escapes the sampling loop:
/// the cycle is logged and the next tick retries implicitly.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Source API unreachable, non-success response, or malformed payload.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The store rejected or could not accept the write.
    #[error("store write failed: {0}")]
    StoreWrite(#[from] StoreError),
}
