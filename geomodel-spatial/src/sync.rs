//! Derived-field synchronization on the write path.
//!
//! Every create and update payload passes through the registered
//! [`WriteHook`]s before it reaches the store. A hook only rewrites the
//! payload; it never fails the write.

use crate::config::{GeoModelConfig, PointFieldConfig};
use crate::store::Attributes;
use geomodel_geojson::{normalize_json, GeoValue, PolygonRepairer};
use serde_json::Value;

/// Payload transformation run before every create or update.
pub trait WriteHook: Send + Sync {
    /// Rewrite a write payload.
    fn before_write(&self, payload: Attributes) -> Attributes;
}

/// Keeps the normalized features field in step with the raw geometry field.
#[derive(Debug, Clone)]
pub struct DerivedFieldSynchronizer {
    geometry_field: String,
    feature_field: String,
    repairer: PolygonRepairer,
}

impl DerivedFieldSynchronizer {
    pub fn new(
        geometry_field: impl Into<String>,
        feature_field: impl Into<String>,
        repairer: PolygonRepairer,
    ) -> Self {
        Self {
            geometry_field: geometry_field.into(),
            feature_field: feature_field.into(),
            repairer,
        }
    }

    pub fn from_config(config: &GeoModelConfig) -> Self {
        Self::new(
            config.geometry_field.clone(),
            config.feature_field.clone(),
            PolygonRepairer::new(config.tolerance),
        )
    }

    pub fn geometry_field(&self) -> &str {
        &self.geometry_field
    }

    pub fn feature_field(&self) -> &str {
        &self.feature_field
    }

    pub fn repairer(&self) -> &PolygonRepairer {
        &self.repairer
    }

    /// Normalize a raw geometry attribute value.
    pub fn derive(&self, raw: &Value) -> geomodel_geojson::Result<Option<GeoValue>> {
        normalize_json(raw, &self.repairer)
    }

    /// The value to store in the features field for `raw`.
    ///
    /// Anything that cannot be normalized stores `null`.
    pub fn feature_value(&self, raw: &Value) -> Value {
        match self.derive(raw) {
            Ok(Some(value)) => value.to_json(),
            Ok(None) => Value::Null,
            Err(e) => {
                tracing::debug!(
                    field = %self.geometry_field,
                    error = %e,
                    "geometry not normalizable; clearing derived field"
                );
                Value::Null
            }
        }
    }
}

impl WriteHook for DerivedFieldSynchronizer {
    fn before_write(&self, mut payload: Attributes) -> Attributes {
        if let Some(raw) = payload.get(&self.geometry_field) {
            let derived = self.feature_value(raw);
            payload.insert(self.feature_field.clone(), derived);
        }
        payload
    }
}

/// Builds a GeoJSON `Point` field from latitude and longitude attributes.
///
/// The point is only written when both coordinates are present and
/// non-zero; otherwise the payload is left alone.
#[derive(Debug, Clone)]
pub struct PointFieldSynchronizer {
    fields: PointFieldConfig,
}

impl PointFieldSynchronizer {
    pub fn new(fields: PointFieldConfig) -> Self {
        Self { fields }
    }

    pub fn point_field(&self) -> &str {
        &self.fields.point_field
    }

    fn coordinate(&self, payload: &Attributes, field: &str) -> Option<f64> {
        payload
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| *v != 0.0 && v.is_finite())
    }
}

impl WriteHook for PointFieldSynchronizer {
    fn before_write(&self, mut payload: Attributes) -> Attributes {
        let lat = self.coordinate(&payload, &self.fields.latitude_field);
        let lng = self.coordinate(&payload, &self.fields.longitude_field);
        if let (Some(lat), Some(lng)) = (lat, lng) {
            let point = GeoValue::Point(geo_types::Coord { x: lng, y: lat });
            payload.insert(self.fields.point_field.clone(), point.to_json());
        }
        payload
    }
}
