//! Error types for spatial models.

use geomodel_geojson::GeoJsonError;
use thiserror::Error;

/// Spatial model errors.
///
/// Index and query failures are always propagated; they are never turned
/// into an empty result.
#[derive(Error, Debug)]
pub enum SpatialError {
    /// The spatial index could not be built (e.g. unreadable stored geometry).
    #[error("Index creation failed on '{field}': {reason}")]
    IndexCreation { field: String, reason: String },

    /// A query needed an index that has not been created.
    #[error("No spatial index on field '{0}'")]
    IndexMissing(String),

    /// The index or store lookup of a query failed.
    #[error("Query phase failed: {0}")]
    QueryPhase(String),

    /// Record store failure.
    #[error("Record store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Geometry error surfaced outside the write path.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeoJsonError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpatialError {
    /// Create a query phase error
    pub fn query_phase(msg: impl Into<String>) -> Self {
        SpatialError::QueryPhase(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        SpatialError::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SpatialError::Config(msg.into())
    }
}

/// Result type for spatial model operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
