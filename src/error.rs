//! Error types for the proximity engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoproxError>;

#[derive(Error, Debug)]
pub enum GeoproxError {
    /// Latitude/longitude out of range or non-finite.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A spatial index was requested over zero points.
    #[error("Cannot build a spatial index from an empty point set")]
    EmptyIndex,

    /// Aligned sequences disagree in length. Always a caller bug.
    #[error("Index contract violated: {0}")]
    IndexContract(String),

    /// Unsupported metric or unit string.
    #[error("Unsupported method argument: {0}")]
    MethodArgument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
