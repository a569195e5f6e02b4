use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Dimension(#[from] DimValidationError),

    #[error("vector data length {len} is not a multiple of dimension {dimension}")]
    RaggedData { len: usize, dimension: usize },
}

pub type IndexResult<T> = Result<T, IndexError>;
