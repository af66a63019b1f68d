//! Geometry decomposition into per-kind coordinate buckets.
//!
//! Every `Multi*` geometry is split into its members and every
//! `GeometryCollection`, `Feature` and `FeatureCollection` is flattened, so a
//! value of any nesting depth becomes three flat lists of raw coordinate
//! payloads. Buckets are built by folding per-node buckets together; no
//! accumulator is shared across the traversal.

use crate::value::{GeoValue, GeometryKind, PolygonRings};
use geo_types::Coord;
use serde_json::Value;

/// Raw coordinate payloads of one value, grouped by base geometry kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuckets {
    /// One entry per polygon (never merged across polygons).
    pub polygon: Vec<PolygonRings>,
    /// One entry per point.
    pub point: Vec<Coord<f64>>,
    /// One entry per line string.
    pub line_string: Vec<Vec<Coord<f64>>>,
}

impl GeometryBuckets {
    /// Check if all three buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty() && self.point.is_empty() && self.line_string.is_empty()
    }

    /// Number of entries in one bucket.
    pub fn count(&self, kind: GeometryKind) -> usize {
        match kind {
            GeometryKind::Polygon => self.polygon.len(),
            GeometryKind::Point => self.point.len(),
            GeometryKind::LineString => self.line_string.len(),
        }
    }

    /// Concatenate two bucket sets, `self` first.
    pub fn merge(mut self, other: GeometryBuckets) -> GeometryBuckets {
        self.polygon.extend(other.polygon);
        self.point.extend(other.point);
        self.line_string.extend(other.line_string);
        self
    }

    /// Keep only the listed kinds; an empty list keeps everything.
    pub fn retain_kinds(self, kinds: &[GeometryKind]) -> GeometryBuckets {
        if kinds.is_empty() {
            return self;
        }
        let keep = |kind: GeometryKind| kinds.contains(&kind);
        GeometryBuckets {
            polygon: if keep(GeometryKind::Polygon) {
                self.polygon
            } else {
                Vec::new()
            },
            point: if keep(GeometryKind::Point) {
                self.point
            } else {
                Vec::new()
            },
            line_string: if keep(GeometryKind::LineString) {
                self.line_string
            } else {
                Vec::new()
            },
        }
    }
}

/// Decompose a geometry value; `None` yields empty buckets.
pub fn decompose(value: Option<&GeoValue>) -> GeometryBuckets {
    value.map(buckets_of).unwrap_or_default()
}

/// Leniently parse then decompose a raw JSON value.
///
/// Anything that is not a recognizable GeoJSON node (including `null`)
/// yields empty buckets.
pub fn decompose_json(value: &Value) -> GeometryBuckets {
    decompose(GeoValue::from_json(value).as_ref())
}

fn buckets_of(value: &GeoValue) -> GeometryBuckets {
    match value {
        GeoValue::Point(c) => GeometryBuckets {
            point: vec![*c],
            ..Default::default()
        },
        GeoValue::MultiPoint(cs) => GeometryBuckets {
            point: cs.clone(),
            ..Default::default()
        },
        GeoValue::LineString(cs) => GeometryBuckets {
            line_string: vec![cs.clone()],
            ..Default::default()
        },
        GeoValue::MultiLineString(lines) => GeometryBuckets {
            line_string: lines.clone(),
            ..Default::default()
        },
        GeoValue::Polygon(rings) => GeometryBuckets {
            polygon: vec![rings.clone()],
            ..Default::default()
        },
        GeoValue::MultiPolygon(polys) => GeometryBuckets {
            polygon: polys.clone(),
            ..Default::default()
        },
        GeoValue::GeometryCollection(members) | GeoValue::FeatureCollection(members) => members
            .iter()
            .map(buckets_of)
            .fold(GeometryBuckets::default(), GeometryBuckets::merge),
        GeoValue::Feature(geometry) => decompose(geometry.as_deref()),
    }
}
