//! The geo model facade.
//!
//! `GeoModel` owns the write path (hooks, then store) and builds two-phase
//! spatial queries against the derived features field.

use crate::config::GeoModelConfig;
use crate::error::{Result, SpatialError};
use crate::index::{SpatialIndex, SpatialPredicate};
use crate::planner::DeferredQuery;
use crate::store::{Attributes, Record, RecordId, RecordStore};
use crate::sync::{DerivedFieldSynchronizer, PointFieldSynchronizer, WriteHook};
use geo_types::Coord;
use geomodel_geojson::{self as geojson, GeoValue, GeometryKind};
use std::fmt;
use std::sync::Arc;

/// Search radius used by [`GeoModel::find_near_point`] when none is given.
pub const DEFAULT_NEAR_DISTANCE: f64 = 1000.0;

/// A model whose records carry a GeoJSON attribute.
#[derive(Clone)]
pub struct GeoModel {
    config: GeoModelConfig,
    index: Arc<dyn SpatialIndex>,
    store: Arc<dyn RecordStore>,
    sync: DerivedFieldSynchronizer,
    point_sync: Option<PointFieldSynchronizer>,
}

impl fmt::Debug for GeoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoModel")
            .field("config", &self.config)
            .field("index", &self.index)
            .field("store", &self.store)
            .finish()
    }
}

impl GeoModel {
    /// Create a model over the given collaborators.
    pub fn new(
        config: GeoModelConfig,
        index: Arc<dyn SpatialIndex>,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self> {
        config.validate()?;
        let sync = DerivedFieldSynchronizer::from_config(&config);
        let point_sync = config.point.clone().map(PointFieldSynchronizer::new);
        Ok(Self {
            config,
            index,
            store,
            sync,
            point_sync,
        })
    }

    pub fn config(&self) -> &GeoModelConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    // === Write path ===

    /// Run every write hook over a payload, in registration order.
    pub fn before_write(&self, payload: Attributes) -> Attributes {
        let hooks = std::iter::once(&self.sync as &dyn WriteHook)
            .chain(self.point_sync.iter().map(|p| p as &dyn WriteHook));
        hooks.fold(payload, |payload, hook| hook.before_write(payload))
    }

    /// Insert a record after deriving its geometry fields.
    pub async fn create(&self, payload: Attributes) -> Result<Record> {
        self.store.insert(self.before_write(payload)).await
    }

    /// Apply a partial update. Fields absent from `patch` are kept,
    /// including the derived ones.
    pub async fn update(&self, id: RecordId, patch: Attributes) -> Result<Option<Record>> {
        self.store.update(id, self.before_write(patch)).await
    }

    pub async fn destroy(&self, id: RecordId) -> Result<bool> {
        self.store.destroy(id).await
    }

    // === Index management ===

    /// Build the spatial index on the features field.
    ///
    /// Safe to call more than once. Failure means spatial queries will not
    /// work and is always returned to the caller.
    pub async fn create_spatial_index(&self) -> Result<()> {
        self.create_index_on(&self.config.feature_field).await
    }

    /// Build the spatial index on the lat/lng point field.
    pub async fn create_point_index(&self) -> Result<()> {
        let field = self.point_field()?.to_string();
        self.create_index_on(&field).await
    }

    async fn create_index_on(&self, field: &str) -> Result<()> {
        match self.index.create_index(field).await {
            Ok(()) => {
                tracing::info!(field, "spatial index ready");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(field, error = %e, "spatial index creation failed");
                Err(e)
            }
        }
    }

    fn point_field(&self) -> Result<&str> {
        self.point_sync
            .as_ref()
            .map(PointFieldSynchronizer::point_field)
            .ok_or_else(|| SpatialError::config("no latitude/longitude point field configured"))
    }

    // === Geometry ===

    /// Normalize an arbitrary GeoJSON value with this model's tolerance.
    pub fn decompose_and_repair(&self, value: &GeoValue) -> Option<GeoValue> {
        geojson::decompose_and_repair(value, self.sync.repairer())
    }

    /// A record's normalized geometry, restricted to `kinds` (all kinds if
    /// empty).
    pub fn geometry(&self, record: &Record, kinds: &[GeometryKind]) -> Option<GeoValue> {
        let stored = record
            .get(&self.config.feature_field)
            .and_then(GeoValue::from_json)?;
        geojson::project(&stored, kinds)
    }

    /// Vertex-average centroid of a record's geometry, as a `Point`.
    pub fn centroid(&self, record: &Record) -> Option<GeoValue> {
        let geometry = self.geometry(record, &[])?;
        geojson::centroid(&geometry).map(GeoValue::Point)
    }

    /// Mass-weighted center of a geometry, as a `Point`.
    pub fn center_of_mass(geometry: &GeoValue) -> Option<GeoValue> {
        geojson::center_of_mass(geometry).map(GeoValue::Point)
    }

    // === Queries ===

    /// Records whose geometry lies within `geometry`.
    pub fn find_within(&self, geometry: &GeoValue) -> DeferredQuery {
        self.deferred(
            &self.config.feature_field,
            SpatialPredicate::Within(geometry.clone()),
        )
    }

    /// Records whose geometry intersects `geometry`.
    pub fn find_intersects(&self, geometry: &GeoValue) -> DeferredQuery {
        self.deferred(
            &self.config.feature_field,
            SpatialPredicate::Intersects(geometry.clone()),
        )
    }

    /// Records within `distance` metres of the center of mass of `geometry`.
    ///
    /// `None` when `geometry` has no center of mass.
    pub fn find_near(&self, geometry: &GeoValue, distance: f64) -> Option<DeferredQuery> {
        let point = geojson::center_of_mass(geometry)?;
        Some(self.near(&self.config.feature_field, point, distance))
    }

    /// Records whose lat/lng point is within `distance` metres
    /// (default [`DEFAULT_NEAR_DISTANCE`]) of the given position.
    pub fn find_near_point(
        &self,
        latitude: f64,
        longitude: f64,
        distance: Option<f64>,
    ) -> Result<DeferredQuery> {
        let field = self.point_field()?.to_string();
        let point = Coord {
            x: longitude,
            y: latitude,
        };
        Ok(self.near(
            &field,
            point,
            distance.unwrap_or(DEFAULT_NEAR_DISTANCE),
        ))
    }

    fn near(&self, field: &str, point: Coord<f64>, max_distance: f64) -> DeferredQuery {
        self.deferred(
            field,
            SpatialPredicate::Near {
                point,
                max_distance,
            },
        )
    }

    fn deferred(&self, field: &str, predicate: SpatialPredicate) -> DeferredQuery {
        DeferredQuery::new(
            Arc::clone(&self.index),
            Arc::clone(&self.store),
            field,
            predicate,
        )
    }
}
