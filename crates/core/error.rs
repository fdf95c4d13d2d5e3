//! Error type shared by every cellpath operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellpathError {
    /// Structurally invalid input: bad coordinates, parameters or pair counts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("GeoJSON document has no bbox member")]
    MissingBoundingBox,

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote record source failed for one cell.
    #[error("Record source error: {0}")]
    Source(String),
}

impl From<geojson::Error> for CellpathError {
    fn from(err: geojson::Error) -> Self {
        CellpathError::GeoJson(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CellpathError>;
