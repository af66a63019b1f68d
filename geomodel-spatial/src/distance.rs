//! Great-circle distances from a point to stored geometry.
//!
//! Distances are haversine metres. Segment distance projects in degree
//! space and measures the projected point with haversine, which is close
//! enough for the short segments of stored features.

use geo::{BoundingRect, Contains};
use geo_types::{Coord, Geometry, LineString, Point, Polygon};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points in metres.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Minimum distance in metres from `origin` (x = lng, y = lat) to a geometry.
///
/// Zero when the point is inside a polygon. Empty geometry is infinitely far.
pub fn min_distance_to_geometry(origin: Coord<f64>, geom: &Geometry<f64>) -> f64 {
    let (lat, lng) = (origin.y, origin.x);
    match geom {
        Geometry::Point(p) => haversine_distance(lat, lng, p.y(), p.x()),
        Geometry::MultiPoint(mp) => mp
            .iter()
            .map(|p| haversine_distance(lat, lng, p.y(), p.x()))
            .fold(f64::INFINITY, f64::min),
        Geometry::LineString(ls) => min_distance_to_linestring(origin, ls),
        Geometry::MultiLineString(mls) => mls
            .iter()
            .map(|ls| min_distance_to_linestring(origin, ls))
            .fold(f64::INFINITY, f64::min),
        Geometry::Polygon(poly) => min_distance_to_polygon(origin, poly),
        Geometry::MultiPolygon(mp) => mp
            .iter()
            .map(|poly| min_distance_to_polygon(origin, poly))
            .fold(f64::INFINITY, f64::min),
        Geometry::GeometryCollection(gc) => gc
            .iter()
            .map(|g| min_distance_to_geometry(origin, g))
            .fold(f64::INFINITY, f64::min),
        // Line, Rect and Triangle never come out of GeoJSON conversion;
        // the clamped bounding box distance is a lower bound for them.
        other => match other.bounding_rect() {
            Some(rect) => {
                let closest = Coord {
                    x: lng.clamp(rect.min().x, rect.max().x),
                    y: lat.clamp(rect.min().y, rect.max().y),
                };
                haversine_distance(lat, lng, closest.y, closest.x)
            }
            None => f64::INFINITY,
        },
    }
}

fn min_distance_to_polygon(origin: Coord<f64>, poly: &Polygon<f64>) -> f64 {
    if poly.contains(&Point::from(origin)) {
        return 0.0;
    }
    // Outside, or inside a hole: nearest boundary of any ring.
    poly.interiors()
        .iter()
        .map(|ring| min_distance_to_linestring(origin, ring))
        .fold(min_distance_to_linestring(origin, poly.exterior()), f64::min)
}

fn min_distance_to_linestring(origin: Coord<f64>, ls: &LineString<f64>) -> f64 {
    match ls.0.as_slice() {
        [] => f64::INFINITY,
        [only] => haversine_distance(origin.y, origin.x, only.y, only.x),
        coords => coords
            .windows(2)
            .map(|w| min_distance_to_segment(origin, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn min_distance_to_segment(origin: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d = b - a;
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq == 0.0 {
        return haversine_distance(origin.y, origin.x, a.y, a.x);
    }

    let t = (((origin.x - a.x) * d.x + (origin.y - a.y) * d.y) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    haversine_distance(origin.y, origin.x, closest.y, closest.x)
}
