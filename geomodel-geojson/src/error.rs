//! Error types for geometry normalization.

use thiserror::Error;

/// Geometry normalization errors.
///
/// None of these ever block a record write: the write hook maps every
/// variant to a `null` derived value. They exist so each stage can say
/// why it produced nothing.
#[derive(Error, Debug)]
pub enum GeoJsonError {
    /// The geometry attribute was a string that is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The value is not a recognizable GeoJSON geometry, feature or collection.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// A polygon's outer ring did not survive cleaning.
    #[error("Degenerate polygon: {0}")]
    DegeneratePolygon(String),
}

impl GeoJsonError {
    /// Create a malformed geometry error
    pub fn malformed(msg: impl Into<String>) -> Self {
        GeoJsonError::MalformedGeometry(msg.into())
    }
}

/// Result type for geometry normalization.
pub type Result<T> = std::result::Result<T, GeoJsonError>;
