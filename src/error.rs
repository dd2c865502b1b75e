use crate::collector::CollectError;
use crate::preprocess::PreprocessError;
use crate::source::SourceError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteofluxError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
}
