//! End-to-end normalization tests.
//!
//! Fixtures follow the RFC 7946 section 1.5 example, deconstructed and
//! reassembled.

use geo::Winding;
use geo_types::{coord, Coord, LineString};
use geomodel_geojson::{
    assemble, centroid, decompose, decompose_and_repair, project, GeoValue, GeometryKind,
    PolygonRepairer,
};
use serde_json::{json, Value};

fn rfc_point() -> Value {
    json!({"type": "Point", "coordinates": [102.0, 0.5]})
}

fn rfc_line_string() -> Value {
    json!({"type": "LineString", "coordinates": [[102.0, 0.0], [103.0, 1.0], [104.0, 0.0], [105.0, 1.0]]})
}

fn rfc_polygon() -> Value {
    json!({"type": "Polygon", "coordinates": [[[100.0, 0.0], [101.0, 0.0], [101.0, 1.0], [100.0, 1.0], [100.0, 0.0]]]})
}

fn rfc_feature_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": rfc_point(), "properties": {"prop0": "value0"}},
            {"type": "Feature", "geometry": rfc_line_string(), "properties": {"prop0": "value0", "prop1": 0.0}},
            {"type": "Feature", "geometry": rfc_polygon(), "properties": {"prop0": "value0", "prop1": {"this": "that"}}}
        ]
    })
}

fn rfc_geometry_collection() -> Value {
    json!({"type": "GeometryCollection", "geometries": [rfc_polygon(), rfc_point(), rfc_line_string()]})
}

fn parse(value: Value) -> GeoValue {
    GeoValue::parse(&value).unwrap()
}

fn normalize(value: Value) -> Option<GeoValue> {
    decompose_and_repair(&parse(value), &PolygonRepairer::default())
}

fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
    points.iter().map(|&(x, y)| coord! { x: x, y: y }).collect()
}

fn outer_ring(value: &GeoValue) -> &Vec<Coord<f64>> {
    match value {
        GeoValue::Polygon(rings) => &rings[0],
        other => panic!("expected polygon, got {:?}", other),
    }
}

/// Rotate a closed ring so it starts at `start` (which must be on the ring).
fn rotate_closed(closed: &[Coord<f64>], start: Coord<f64>) -> Vec<Coord<f64>> {
    let open = &closed[..closed.len() - 1];
    let at = open.iter().position(|c| *c == start).unwrap();
    let mut out: Vec<_> = open[at..].iter().chain(open[..at].iter()).copied().collect();
    out.push(out[0]);
    out
}

#[test]
fn feature_collection_normalizes_to_ordered_geometry_collection() {
    let normalized = normalize(rfc_feature_collection()).unwrap();
    assert_eq!(normalized, parse(rfc_geometry_collection()));
    assert_eq!(normalized.to_json(), rfc_geometry_collection());
}

#[test]
fn assembling_a_canonical_value_is_idempotent() {
    for value in [
        rfc_geometry_collection(),
        rfc_polygon(),
        rfc_point(),
        rfc_line_string(),
        json!({"type": "MultiPoint", "coordinates": [[100.5, 0.5], [102.5, 0.5]]}),
    ] {
        let canonical = parse(value);
        assert_eq!(assemble(decompose(Some(&canonical))), Some(canonical.clone()));
        assert_eq!(
            decompose_and_repair(&canonical, &PolygonRepairer::default()),
            Some(canonical)
        );
    }
}

#[test]
fn malformed_rectangle_is_closed_and_rewound() {
    let mess = json!({"type": "Polygon", "coordinates": [[
        [-78.81248474121094, 35.68853320738875],
        [-78.81248474121094, 35.862343734896484],
        [-78.45817565917967, 35.862343734896484],
        [-78.45817565917967, 35.68853320738875]
    ]]});
    let cleaned = json!({"type": "Polygon", "coordinates": [[
        [-78.81248474121094, 35.68853320738875],
        [-78.45817565917967, 35.68853320738875],
        [-78.45817565917967, 35.862343734896484],
        [-78.81248474121094, 35.862343734896484],
        [-78.81248474121094, 35.68853320738875]
    ]]});
    assert_eq!(normalize(mess).unwrap().to_json(), cleaned);
}

#[test]
fn rectangle_orientation_does_not_depend_on_start_corner() {
    let corners = [(-78.812, 35.689), (-78.812, 35.862), (-78.458, 35.862), (-78.458, 35.689)];
    let expected = ring(&[
        (-78.812, 35.689),
        (-78.458, 35.689),
        (-78.458, 35.862),
        (-78.812, 35.862),
        (-78.812, 35.689),
    ]);

    for start in 0..corners.len() {
        let rotated: Vec<(f64, f64)> = corners[start..]
            .iter()
            .chain(corners[..start].iter())
            .copied()
            .collect();
        let input = GeoValue::Polygon(vec![ring(&rotated)]);
        let output = decompose_and_repair(&input, &PolygonRepairer::default()).unwrap();
        let out_ring = outer_ring(&output);

        assert_eq!(out_ring.len(), 5);
        assert_eq!(out_ring.first(), out_ring.last());
        assert!(LineString::new(out_ring.clone()).is_ccw());
        assert_eq!(*out_ring, rotate_closed(&expected, out_ring[0]));
    }
}

#[test]
fn repaired_rings_are_closed_and_free_of_adjacent_duplicates() {
    let inputs = [
        json!({"type": "Polygon", "coordinates": [[[0, 0], [0, 0], [4, 0], [4, 4], [0, 4]]]}),
        json!({"type": "Polygon", "coordinates": [
            [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
            [[2, 2], [2, 2.0000001], [2, 8], [8, 8], [8, 2]]
        ]}),
        json!({"type": "MultiPolygon", "coordinates": [
            [[[0, 0], [1, 0], [1, 1], [0, 1], [0.0000001, 0]]],
            [[[5, 5], [5, 6], [6, 6], [6, 5], [5, 5], [5, 5]]]
        ]}),
        // the tail creeps back to the start in steps smaller than the tolerance
        json!({"type": "Polygon", "coordinates": [
            [[0, 0], [1, 0], [1, 1], [-0.0000009, 0.0000001], [0.0000005, 0]]
        ]}),
    ];
    let tolerance = PolygonRepairer::default().tolerance();

    for input in inputs {
        let normalized = normalize(input).unwrap();
        let buckets = decompose(Some(&normalized));
        assert!(!buckets.polygon.is_empty());
        for r in buckets.polygon.iter().flatten() {
            assert!(r.len() >= 4);
            assert_eq!(r.first(), r.last());
            for pair in r.windows(2) {
                let close =
                    (pair[0].x - pair[1].x).abs() < tolerance && (pair[0].y - pair[1].y).abs() < tolerance;
                assert!(!close, "adjacent duplicate in {:?}", r);
            }
        }
    }
}

#[test]
fn degenerate_outer_ring_does_not_promote_holes() {
    let input = json!({"type": "Polygon", "coordinates": [
        [[0, 0], [10, 0], [0, 0]],
        [[2, 2], [8, 2], [8, 8], [2, 8], [2, 2]]
    ]});
    assert_eq!(normalize(input), None);
}

#[test]
fn degenerate_polygon_leaves_sibling_geometries() {
    let input = json!({"type": "GeometryCollection", "geometries": [
        {"type": "Polygon", "coordinates": [[[0, 0], [1, 1]]]},
        {"type": "Point", "coordinates": [3, 3]}
    ]});
    assert_eq!(normalize(input), Some(GeoValue::Point(coord! { x: 3.0, y: 3.0 })));
}

#[test]
fn multiplicity_rule() {
    let two_points = json!({"type": "GeometryCollection", "geometries": [
        {"type": "Point", "coordinates": [1, 1]},
        {"type": "Point", "coordinates": [2, 2]}
    ]});
    assert_eq!(normalize(two_points).unwrap().type_name(), "MultiPoint");

    let one_point_in_feature = json!({"type": "Feature", "properties": null,
        "geometry": {"type": "MultiPoint", "coordinates": [[1, 1]]}});
    assert_eq!(normalize(one_point_in_feature).unwrap().type_name(), "Point");

    let point_and_line = json!({"type": "GeometryCollection", "geometries": [
        {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
        {"type": "Point", "coordinates": [2, 2]}
    ]});
    match normalize(point_and_line).unwrap() {
        GeoValue::GeometryCollection(members) => {
            let names: Vec<_> = members.iter().map(GeoValue::type_name).collect();
            assert_eq!(names, ["Point", "LineString"]);
        }
        other => panic!("expected collection, got {:?}", other),
    }

    assert_eq!(normalize(json!({"type": "FeatureCollection", "features": []})), None);
}

#[test]
fn centroid_of_rfc_example() {
    let normalized = normalize(rfc_feature_collection()).unwrap();
    assert_eq!(centroid(&normalized), Some(coord! { x: 102.0, y: 0.5 }));
}

#[test]
fn projection_by_kind() {
    let normalized = normalize(rfc_feature_collection()).unwrap();
    assert_eq!(project(&normalized, &[GeometryKind::Polygon]), Some(parse(rfc_polygon())));
    assert_eq!(project(&normalized, &[GeometryKind::Point]), Some(parse(rfc_point())));
    assert_eq!(
        project(&normalized, &[GeometryKind::LineString]),
        Some(parse(rfc_line_string()))
    );
    assert_eq!(project(&normalized, &GeometryKind::ALL), Some(normalized.clone()));
    assert_eq!(project(&normalized, &[]), Some(normalized));
}

#[test]
fn multipolygon_projected_to_points_is_none() {
    let multi = parse(json!({"type": "MultiPolygon", "coordinates": [
        [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]],
        [[[5, 5], [6, 5], [6, 6], [5, 6], [5, 5]]]
    ]}));
    assert_eq!(project(&multi, &[GeometryKind::Point]), None);
}

#[test]
fn features_inside_geometry_collections_contribute_nothing() {
    let wrapped = json!({"type": "GeometryCollection", "geometries": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}
    ]});
    assert_eq!(normalize(wrapped), None);
}
