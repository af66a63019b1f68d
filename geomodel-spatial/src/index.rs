//! Spatial index seam.
//!
//! The index answers one question: which records' derived geometry field
//! satisfies a predicate. It returns ids only; loading records is the
//! [`RecordStore`](crate::store::RecordStore)'s job.

use crate::error::Result;
use crate::store::RecordId;
use async_trait::async_trait;
use geo_types::Coord;
use geomodel_geojson::GeoValue;
use std::fmt::{self, Debug};

/// A spatial predicate against a single geometry field.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialPredicate {
    /// Stored geometry lies within the query geometry.
    Within(GeoValue),
    /// Stored geometry intersects the query geometry.
    Intersects(GeoValue),
    /// Stored geometry is within `max_distance` metres of `point`
    /// (x = longitude, y = latitude).
    Near { point: Coord<f64>, max_distance: f64 },
}

impl SpatialPredicate {
    /// Operator name, for logs.
    pub fn operator(&self) -> &'static str {
        match self {
            SpatialPredicate::Within(_) => "within",
            SpatialPredicate::Intersects(_) => "intersects",
            SpatialPredicate::Near { .. } => "near",
        }
    }
}

impl fmt::Display for SpatialPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialPredicate::Within(g) | SpatialPredicate::Intersects(g) => {
                write!(f, "{} {}", self.operator(), g.type_name())
            }
            SpatialPredicate::Near {
                point,
                max_distance,
            } => write!(
                f,
                "near ({}, {}) within {}m",
                point.x, point.y, max_distance
            ),
        }
    }
}

/// Spatial index over a derived geometry field.
#[async_trait]
pub trait SpatialIndex: Debug + Send + Sync {
    /// Build the index on `field`. Idempotent.
    ///
    /// Fails with `IndexCreation` if existing data cannot be indexed.
    async fn create_index(&self, field: &str) -> Result<()>;

    /// Ids of records whose `field` satisfies `predicate`.
    ///
    /// `Near` results are ordered nearest first.
    async fn find(&self, field: &str, predicate: &SpatialPredicate) -> Result<Vec<RecordId>>;
}
