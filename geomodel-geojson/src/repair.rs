//! Polygon repair.
//!
//! Each ring is cleaned independently:
//!
//! 1. vertices within tolerance of the previously kept vertex are dropped
//! 2. a near-duplicate endpoint is dropped and the first vertex re-appended,
//!    so every ring ends closed on an exact copy of its start
//! 3. rings left with fewer than 4 positions are discarded; losing the outer
//!    ring loses the polygon (holes are never promoted)
//!
//! Then the whole ring set is reoriented: outer ring counter-clockwise,
//! holes clockwise (RFC 7946 right-hand rule). Orientation comes from the
//! ring's winding order, so the result does not depend on which vertex the
//! input starts at.

use crate::decompose::GeometryBuckets;
use crate::error::{GeoJsonError, Result};
use crate::value::{PolygonRings, Ring};
use geo::Winding;
use geo_types::{Coord, LineString};

/// Default vertex tolerance in degrees (about 10 cm at the equator).
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Minimum positions in a valid closed ring.
pub const MIN_RING_POSITIONS: usize = 4;

/// Cleans polygon ring sets.
#[derive(Debug, Clone, Copy)]
pub struct PolygonRepairer {
    tolerance: f64,
}

impl Default for PolygonRepairer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl PolygonRepairer {
    /// Create a repairer with the given vertex tolerance (degrees).
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Vertex tolerance in degrees.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Repair one polygon's rings.
    ///
    /// Returns `DegeneratePolygon` if the polygon has no rings or its outer
    /// ring does not survive cleaning. Degenerate holes are dropped silently.
    pub fn repair(&self, rings: &[Ring]) -> Result<PolygonRings> {
        let (outer, holes) = rings
            .split_first()
            .ok_or_else(|| GeoJsonError::DegeneratePolygon("polygon has no rings".into()))?;

        let outer = self.clean_ring(outer).ok_or_else(|| {
            GeoJsonError::DegeneratePolygon(format!(
                "outer ring has fewer than {} positions after cleaning",
                MIN_RING_POSITIONS
            ))
        })?;

        let mut cleaned = Vec::with_capacity(rings.len());
        cleaned.push(orient(outer, true));
        cleaned.extend(
            holes
                .iter()
                .filter_map(|hole| self.clean_ring(hole))
                .map(|hole| orient(hole, false)),
        );
        Ok(cleaned)
    }

    /// Repair every polygon in the buckets, dropping the degenerate ones.
    ///
    /// Point and line string buckets pass through unchanged.
    pub fn repair_buckets(&self, buckets: GeometryBuckets) -> GeometryBuckets {
        let polygon = buckets
            .polygon
            .iter()
            .enumerate()
            .filter_map(|(idx, rings)| match self.repair(rings) {
                Ok(repaired) => Some(repaired),
                Err(e) => {
                    tracing::debug!(polygon = idx, error = %e, "dropping polygon");
                    None
                }
            })
            .collect();
        GeometryBuckets {
            polygon,
            ..buckets
        }
    }

    /// De-duplicate and close one ring; `None` if it is degenerate.
    fn clean_ring(&self, ring: &[Coord<f64>]) -> Option<Ring> {
        let mut kept: Ring = Vec::with_capacity(ring.len() + 1);
        for &c in ring {
            match kept.last() {
                Some(prev) if self.same(prev, &c) => {}
                _ => kept.push(c),
            }
        }

        let first = *kept.first()?;
        while kept.len() > 1 && kept.last().is_some_and(|last| self.same(last, &first)) {
            kept.pop();
        }
        kept.push(first);

        (kept.len() >= MIN_RING_POSITIONS).then_some(kept)
    }

    fn same(&self, a: &Coord<f64>, b: &Coord<f64>) -> bool {
        (a.x - b.x).abs() < self.tolerance && (a.y - b.y).abs() < self.tolerance
    }
}

/// Orient a closed ring: counter-clockwise for the outer ring, clockwise for holes.
///
/// Rings without a winding order (collinear) are left as they are.
fn orient(ring: Ring, outer: bool) -> Ring {
    let mut line = LineString::new(ring);
    if outer {
        line.make_ccw_winding();
    } else {
        line.make_cw_winding();
    }
    line.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    fn ring(points: &[(f64, f64)]) -> Ring {
        points.iter().map(|&(x, y)| coord! { x: x, y: y }).collect()
    }

    fn line(r: &Ring) -> LineString<f64> {
        LineString::new(r.clone())
    }

    #[test]
    fn test_drops_adjacent_duplicates() {
        let repaired = PolygonRepairer::default()
            .repair(&[ring(&[
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0000001, 0.0),
                (1.0, 1.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
            ])])
            .unwrap();
        assert_eq!(
            repaired[0],
            ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn test_near_duplicate_endpoint_replaced_by_exact_start() {
        let repaired = PolygonRepairer::default()
            .repair(&[ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0000004, 0.0)])])
            .unwrap();
        assert_eq!(repaired[0].len(), 4);
        assert_eq!(repaired[0][0], repaired[0][3]);
    }

    #[test]
    fn test_trailing_run_near_start_collapses_into_closure() {
        let repaired = PolygonRepairer::default()
            .repair(&[ring(&[
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (-0.0000009, 0.0000001),
                (0.0000005, 0.0),
            ])])
            .unwrap();
        assert_eq!(
            repaired[0],
            ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn test_degenerate_outer_ring_drops_polygon() {
        let hole = ring(&[(0.2, 0.2), (0.2, 0.8), (0.8, 0.8), (0.8, 0.2), (0.2, 0.2)]);
        let err = PolygonRepairer::default()
            .repair(&[ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]), hole])
            .unwrap_err();
        assert!(matches!(err, GeoJsonError::DegeneratePolygon(_)));
    }

    #[test]
    fn test_degenerate_hole_dropped() {
        let outer = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let bad_hole = ring(&[(0.5, 0.5), (0.5, 0.5), (0.6, 0.6)]);
        let repaired = PolygonRepairer::default().repair(&[outer, bad_hole]).unwrap();
        assert_eq!(repaired.len(), 1);
    }

    #[test]
    fn test_empty_ring_set_is_degenerate() {
        assert!(PolygonRepairer::default().repair(&[]).is_err());
        assert!(PolygonRepairer::default().repair(&[vec![]]).is_err());
    }

    #[test]
    fn test_winding_outer_ccw_holes_cw() {
        // outer clockwise, hole counter-clockwise: both wrong
        let outer = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
        let hole = ring(&[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0), (2.0, 2.0)]);
        let repaired = PolygonRepairer::default().repair(&[outer, hole]).unwrap();
        assert!(line(&repaired[0]).is_ccw());
        assert!(line(&repaired[1]).is_cw());
        assert_eq!(repaired[0][0], coord! { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_repair_buckets_keeps_other_kinds() {
        let buckets = GeometryBuckets {
            polygon: vec![vec![ring(&[(0.0, 0.0), (1.0, 1.0)])]],
            point: vec![coord! { x: 1.0, y: 2.0 }],
            line_string: vec![],
        };
        let repaired = PolygonRepairer::default().repair_buckets(buckets);
        assert!(repaired.polygon.is_empty());
        assert_eq!(repaired.point.len(), 1);
    }
}
