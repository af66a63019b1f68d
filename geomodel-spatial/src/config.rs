//! Geo model configuration.
//!
//! Loaded from TOML (default) or JSON:
//!
//! ```toml
//! geometry_field = "location"
//! feature_field = "locationFeatures"
//! tolerance = 1e-6
//!
//! [point]
//! latitude_field = "lat"
//! longitude_field = "lng"
//! point_field = "geoPoint"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::error::{Result, SpatialError};
use geomodel_geojson::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default name of the primary GeoJSON attribute.
pub const DEFAULT_GEOMETRY_FIELD: &str = "geo";

/// Default name of the derived, indexed features attribute.
pub const DEFAULT_FEATURE_FIELD: &str = "geoFeatures";

/// Configuration for a model with a GeoJSON attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoModelConfig {
    /// Primary GeoJSON attribute (arbitrary GeoJSON, possibly a JSON string).
    pub geometry_field: String,

    /// Derived attribute holding the normalized geometry; the spatial index
    /// is built on this one.
    pub feature_field: String,

    /// Vertex de-duplication tolerance in degrees.
    pub tolerance: f64,

    /// Latitude/longitude point derivation (disabled when absent).
    pub point: Option<PointFieldConfig>,
}

impl Default for GeoModelConfig {
    fn default() -> Self {
        Self {
            geometry_field: DEFAULT_GEOMETRY_FIELD.to_string(),
            feature_field: DEFAULT_FEATURE_FIELD.to_string(),
            tolerance: DEFAULT_TOLERANCE,
            point: None,
        }
    }
}

impl GeoModelConfig {
    /// Set the primary GeoJSON attribute name.
    pub fn with_geometry_field(mut self, field: impl Into<String>) -> Self {
        self.geometry_field = field.into();
        self
    }

    /// Set the derived features attribute name.
    pub fn with_feature_field(mut self, field: impl Into<String>) -> Self {
        self.feature_field = field.into();
        self
    }

    /// Set the vertex tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable latitude/longitude point derivation.
    pub fn with_point(mut self, point: PointFieldConfig) -> Self {
        self.point = Some(point);
        self
    }

    /// Check field names and tolerance.
    pub fn validate(&self) -> Result<()> {
        if self.geometry_field.is_empty() || self.feature_field.is_empty() {
            return Err(SpatialError::config("field names must not be empty"));
        }
        if self.geometry_field == self.feature_field {
            return Err(SpatialError::config(format!(
                "geometry_field and feature_field are both '{}'",
                self.geometry_field
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SpatialError::config(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if let Some(point) = &self.point {
            point.validate()?;
        }
        Ok(())
    }

    /// Parse from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are JSON, anything else is TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }
}

/// Field names for latitude/longitude point derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointFieldConfig {
    pub latitude_field: String,
    pub longitude_field: String,
    /// Derived GeoJSON `Point` attribute.
    pub point_field: String,
}

impl Default for PointFieldConfig {
    fn default() -> Self {
        Self {
            latitude_field: "latitude".to_string(),
            longitude_field: "longitude".to_string(),
            point_field: "geoPoint".to_string(),
        }
    }
}

impl PointFieldConfig {
    fn validate(&self) -> Result<()> {
        if self.latitude_field.is_empty()
            || self.longitude_field.is_empty()
            || self.point_field.is_empty()
        {
            return Err(SpatialError::config("point field names must not be empty"));
        }
        Ok(())
    }
}
