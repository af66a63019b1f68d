//! Point summaries and kind projection of stored geometry.

use crate::assemble::assemble;
use crate::decompose::decompose;
use crate::value::{GeoValue, GeometryKind, Ring};
use geo::Centroid;
use geo_types::Coord;

/// Re-decompose a geometry and reassemble only the listed kinds.
///
/// An empty `kinds` list means all kinds. No polygon repair is applied;
/// the input is expected to be an already normalized value.
pub fn project(value: &GeoValue, kinds: &[GeometryKind]) -> Option<GeoValue> {
    assemble(decompose(Some(value)).retain_kinds(kinds))
}

/// Simple centroid: the mean of every vertex in the geometry.
///
/// The closing position of a closed ring is not counted twice.
/// `None` if the geometry has no vertices.
pub fn centroid(value: &GeoValue) -> Option<Coord<f64>> {
    let buckets = decompose(Some(value));
    let ring_vertices = buckets
        .polygon
        .iter()
        .flatten()
        .flat_map(|ring| open_ring(ring).iter());
    let line_vertices = buckets.line_string.iter().flatten();

    let (sum, count) = ring_vertices
        .chain(buckets.point.iter())
        .chain(line_vertices)
        .fold((Coord { x: 0.0, y: 0.0 }, 0usize), |(sum, n), c| {
            (sum + *c, n + 1)
        });

    (count > 0).then(|| sum / count as f64)
}

/// Mass-weighted center: area-weighted for polygons, length-weighted for
/// lines, averaged for points; the highest dimension present wins.
///
/// Used to reduce an arbitrary geometry to a single point. Multi geometries
/// and collections are weighted member by member rather than reduced to the
/// centroid of their convex hull, so a small outlying part barely moves the
/// result.
pub fn center_of_mass(value: &GeoValue) -> Option<Coord<f64>> {
    value.to_geometry()?.centroid().map(|p| p.0)
}

fn open_ring(ring: &Ring) -> &[Coord<f64>] {
    match ring.as_slice() {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        all => all,
    }
}
