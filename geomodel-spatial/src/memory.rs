//! In-memory record store and spatial index.
//!
//! Backs tests and the CLI. Records live in a `BTreeMap` so scans run in id
//! order; spatial lookups are a full scan with exact `geo` predicates.

use crate::distance::min_distance_to_geometry;
use crate::error::{Result, SpatialError};
use crate::index::{SpatialIndex, SpatialPredicate};
use crate::store::{Attributes, QueryCriteria, Record, RecordId, RecordStore};
use async_trait::async_trait;
use geo::{Intersects, Within};
use geo_types::Geometry;
use geomodel_geojson::GeoValue;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<RecordId, Attributes>,
    next_id: RecordId,
    indexed_fields: BTreeSet<String>,
}

impl MemoryState {
    fn record(&self, id: RecordId) -> Option<Record> {
        self.records
            .get(&id)
            .map(|attrs| Record::new(id, attrs.clone()))
    }
}

/// A record store and spatial index sharing one in-memory table.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryGeoStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryGeoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.records.is_empty())
    }

    /// Whether `create_index` has run for `field`.
    pub fn is_indexed(&self, field: &str) -> Result<bool> {
        Ok(self.read()?.indexed_fields.contains(field))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.inner
            .read()
            .map_err(|_| SpatialError::store("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.inner
            .write()
            .map_err(|_| SpatialError::store("memory store lock poisoned"))
    }
}

/// Stored geometry of a record's field, if it holds any.
fn stored_geometry(attrs: &Attributes, field: &str) -> Option<Geometry<f64>> {
    attrs
        .get(field)
        .and_then(GeoValue::from_json)
        .and_then(|value| value.to_geometry())
}

fn query_geometry(value: &GeoValue) -> Result<Geometry<f64>> {
    value.to_geometry().ok_or_else(|| {
        SpatialError::query_phase(format!(
            "query {} has no usable geometry",
            value.type_name()
        ))
    })
}

#[async_trait]
impl RecordStore for MemoryGeoStore {
    async fn insert(&self, attributes: Attributes) -> Result<Record> {
        let mut state = self.write()?;
        state.next_id += 1;
        let id = state.next_id;
        state.records.insert(id, attributes.clone());
        Ok(Record::new(id, attributes))
    }

    async fn update(&self, id: RecordId, patch: Attributes) -> Result<Option<Record>> {
        let mut state = self.write()?;
        let Some(attrs) = state.records.get_mut(&id) else {
            return Ok(None);
        };
        attrs.extend(patch);
        Ok(state.record(id))
    }

    async fn destroy(&self, id: RecordId) -> Result<bool> {
        Ok(self.write()?.records.remove(&id).is_some())
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.read()?.record(id))
    }

    async fn execute(&self, criteria: &QueryCriteria) -> Result<Vec<Record>> {
        let state = self.read()?;
        let records = state
            .records
            .iter()
            .map(|(id, attrs)| Record::new(*id, attrs.clone()));
        Ok(criteria.apply(records))
    }
}

#[async_trait]
impl SpatialIndex for MemoryGeoStore {
    async fn create_index(&self, field: &str) -> Result<()> {
        let mut state = self.write()?;
        if state.indexed_fields.contains(field) {
            return Ok(());
        }

        for (id, attrs) in &state.records {
            match attrs.get(field) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    if GeoValue::from_json(value).is_none() {
                        return Err(SpatialError::IndexCreation {
                            field: field.to_string(),
                            reason: format!("record {} holds a value that is not GeoJSON", id),
                        });
                    }
                }
            }
        }

        state.indexed_fields.insert(field.to_string());
        tracing::debug!(field, records = state.records.len(), "spatial index built");
        Ok(())
    }

    async fn find(&self, field: &str, predicate: &SpatialPredicate) -> Result<Vec<RecordId>> {
        let state = self.read()?;
        let candidates = state
            .records
            .iter()
            .filter_map(|(id, attrs)| stored_geometry(attrs, field).map(|g| (*id, g)));

        let ids = match predicate {
            SpatialPredicate::Within(query) => {
                let query = query_geometry(query)?;
                candidates
                    .filter(|(_, geom)| geom.is_within(&query))
                    .map(|(id, _)| id)
                    .collect()
            }
            SpatialPredicate::Intersects(query) => {
                let query = query_geometry(query)?;
                candidates
                    .filter(|(_, geom)| geom.intersects(&query))
                    .map(|(id, _)| id)
                    .collect()
            }
            SpatialPredicate::Near {
                point,
                max_distance,
            } => {
                if !state.indexed_fields.contains(field) {
                    return Err(SpatialError::IndexMissing(field.to_string()));
                }
                let mut hits: Vec<(RecordId, f64)> = candidates
                    .map(|(id, geom)| (id, min_distance_to_geometry(*point, &geom)))
                    .filter(|(_, d)| *d <= *max_distance)
                    .collect();
                hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
                hits.into_iter().map(|(id, _)| id).collect()
            }
        };
        Ok(ids)
    }
}
