//! Reassembly of coordinate buckets into one canonical geometry.
//!
//! Per kind, in `Polygon`, `Point`, `LineString` order: one entry becomes the
//! bare geometry, several become the `Multi` form, none contributes nothing.
//! One contributing kind is returned as is; several are wrapped in a
//! `GeometryCollection`.

use crate::decompose::GeometryBuckets;
use crate::value::{GeoValue, GeometryKind};

/// Assemble buckets; `None` if every bucket is empty.
pub fn assemble(buckets: GeometryBuckets) -> Option<GeoValue> {
    let GeometryBuckets {
        polygon,
        point,
        line_string,
    } = buckets;

    let mut geometries: Vec<GeoValue> = GeometryKind::ALL
        .iter()
        .filter_map(|kind| match kind {
            GeometryKind::Polygon => wrap(&polygon, GeoValue::Polygon, GeoValue::MultiPolygon),
            GeometryKind::Point => wrap(&point, GeoValue::Point, GeoValue::MultiPoint),
            GeometryKind::LineString => {
                wrap(&line_string, GeoValue::LineString, GeoValue::MultiLineString)
            }
        })
        .collect();

    match geometries.len() {
        0 => None,
        1 => geometries.pop(),
        _ => Some(GeoValue::GeometryCollection(geometries)),
    }
}

fn wrap<T: Clone>(
    entries: &[T],
    single: impl FnOnce(T) -> GeoValue,
    multi: impl FnOnce(Vec<T>) -> GeoValue,
) -> Option<GeoValue> {
    match entries {
        [] => None,
        [only] => Some(single(only.clone())),
        _ => Some(multi(entries.to_vec())),
    }
}
