//! GeoJSON geometry values.
//!
//! [`GeoValue`] is the tagged union over the seven RFC 7946 geometry types
//! plus the `Feature`/`FeatureCollection` wrappers accepted on input.
//!
//! # Parsing
//!
//! Parsing is lenient at the node level: [`GeoValue::from_json`] consumes only
//! the shapes it recognizes and skips everything else without failing the
//! surrounding value.
//!
//! - A node with a missing or unknown `type` is skipped.
//! - A node whose `coordinates` do not have the depth its type requires is
//!   skipped as a whole (one bad position drops the whole `LineString` or
//!   `Polygon`).
//! - Members of `Multi*` geometries, `GeometryCollection`s and
//!   `FeatureCollection`s are parsed one by one; unparseable members are
//!   dropped and their siblings survive.
//! - A `Feature`'s `geometry` and the members of a `GeometryCollection` must
//!   be geometries; a nested `Feature` or `FeatureCollection` there is skipped.
//! - Positions need at least two finite numbers; altitude is ignored.

use crate::error::{GeoJsonError, Result};
use geo_types::{Coord, Geometry};
use geojson::{Feature, FeatureCollection, GeoJson, Position};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A linear ring: an ordered sequence of positions.
pub type Ring = Vec<Coord<f64>>;

/// One polygon's rings: outer ring first, then holes.
pub type PolygonRings = Vec<Ring>;

/// Base geometry kind, the unit a [`GeoValue`] is decomposed into.
///
/// The declaration order is the canonical assembly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Polygon,
    Point,
    LineString,
}

impl GeometryKind {
    /// All kinds in canonical order.
    pub const ALL: [GeometryKind; 3] = [
        GeometryKind::Polygon,
        GeometryKind::Point,
        GeometryKind::LineString,
    ];

    /// GeoJSON type name of the single form.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
        }
    }

    /// GeoJSON type name of the `Multi` form.
    pub fn multi_str(&self) -> &'static str {
        match self {
            GeometryKind::Polygon => "MultiPolygon",
            GeometryKind::Point => "MultiPoint",
            GeometryKind::LineString => "MultiLineString",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = GeoJsonError;

    /// Accepts the GeoJSON name in any case, with or without `-`/`_`
    /// separators (`LineString`, `line-string`, `line_string`).
    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "polygon" => Ok(GeometryKind::Polygon),
            "point" => Ok(GeometryKind::Point),
            "linestring" => Ok(GeometryKind::LineString),
            _ => Err(GeoJsonError::malformed(format!(
                "unknown geometry kind: {}",
                s
            ))),
        }
    }
}

/// A GeoJSON geometry, or a feature wrapper around one.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoValue {
    Point(Coord<f64>),
    MultiPoint(Vec<Coord<f64>>),
    LineString(Vec<Coord<f64>>),
    MultiLineString(Vec<Vec<Coord<f64>>>),
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
    GeometryCollection(Vec<GeoValue>),
    /// A feature; properties are not retained.
    Feature(Option<Box<GeoValue>>),
    /// A feature collection; every member is a `Feature`.
    FeatureCollection(Vec<GeoValue>),
}

impl GeoValue {
    /// GeoJSON `type` member for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoValue::Point(_) => "Point",
            GeoValue::MultiPoint(_) => "MultiPoint",
            GeoValue::LineString(_) => "LineString",
            GeoValue::MultiLineString(_) => "MultiLineString",
            GeoValue::Polygon(_) => "Polygon",
            GeoValue::MultiPolygon(_) => "MultiPolygon",
            GeoValue::GeometryCollection(_) => "GeometryCollection",
            GeoValue::Feature(_) => "Feature",
            GeoValue::FeatureCollection(_) => "FeatureCollection",
        }
    }

    /// Leniently parse a JSON value; `None` if the top-level node is not a
    /// recognizable geometry, feature or collection.
    pub fn from_json(value: &Value) -> Option<GeoValue> {
        let obj = value.as_object()?;
        match obj.get("type")?.as_str()? {
            "Feature" => Some(GeoValue::Feature(
                obj.get("geometry")
                    .and_then(GeoValue::from_geometry_json)
                    .map(Box::new),
            )),
            "FeatureCollection" => obj
                .get("features")
                .and_then(|f| {
                    parse_members(f, |member| match GeoValue::from_json(member) {
                        Some(feature @ GeoValue::Feature(_)) => Some(feature),
                        _ => None,
                    })
                })
                .map(GeoValue::FeatureCollection),
            kind => geometry_from_object(obj, kind),
        }
    }

    /// Leniently parse a geometry node; features are not geometries.
    pub fn from_geometry_json(value: &Value) -> Option<GeoValue> {
        let obj = value.as_object()?;
        geometry_from_object(obj, obj.get("type")?.as_str()?)
    }

    /// Parse a JSON value, failing if the top-level node is unrecognizable.
    pub fn parse(value: &Value) -> Result<GeoValue> {
        GeoValue::from_json(value).ok_or_else(|| {
            let kind = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<missing>");
            GeoJsonError::malformed(format!("unrecognized GeoJSON value (type: {})", kind))
        })
    }

    /// Parse GeoJSON text.
    pub fn from_json_str(s: &str) -> Result<GeoValue> {
        let value: Value = serde_json::from_str(s)?;
        GeoValue::parse(&value)
    }

    /// Render as a GeoJSON object.
    pub fn to_json(&self) -> Value {
        // coordinates and string keys only; serialization cannot fail
        serde_json::to_value(self.to_geojson()).unwrap_or(Value::Null)
    }

    /// Convert to a [`geojson`] value. Feature properties are not retained.
    pub fn to_geojson(&self) -> GeoJson {
        let value = match self {
            GeoValue::Point(c) => geojson::Value::Point(position(c)),
            GeoValue::MultiPoint(cs) => geojson::Value::MultiPoint(positions(cs)),
            GeoValue::LineString(cs) => geojson::Value::LineString(positions(cs)),
            GeoValue::MultiLineString(lines) => {
                geojson::Value::MultiLineString(lines.iter().map(|l| positions(l)).collect())
            }
            GeoValue::Polygon(rings) => geojson::Value::Polygon(ring_positions(rings)),
            GeoValue::MultiPolygon(polys) => {
                geojson::Value::MultiPolygon(polys.iter().map(|p| ring_positions(p)).collect())
            }
            GeoValue::GeometryCollection(members) => geojson::Value::GeometryCollection(
                members.iter().filter_map(GeoValue::to_geojson_geometry).collect(),
            ),
            GeoValue::Feature(geometry) => {
                return GeoJson::Feature(Feature {
                    bbox: None,
                    geometry: geometry.as_deref().and_then(GeoValue::to_geojson_geometry),
                    id: None,
                    properties: None,
                    foreign_members: None,
                })
            }
            GeoValue::FeatureCollection(members) => {
                return GeoJson::FeatureCollection(FeatureCollection {
                    bbox: None,
                    features: members
                        .iter()
                        .filter_map(|member| match member.to_geojson() {
                            GeoJson::Feature(feature) => Some(feature),
                            _ => None,
                        })
                        .collect(),
                    foreign_members: None,
                })
            }
        };
        GeoJson::Geometry(geojson::Geometry::new(value))
    }

    fn to_geojson_geometry(&self) -> Option<geojson::Geometry> {
        match self.to_geojson() {
            GeoJson::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Convert to a `geo_types` geometry for predicate and centroid math.
    ///
    /// Feature wrappers are unwrapped; a feature without geometry, or a
    /// polygon without rings, converts to nothing.
    pub fn to_geometry(&self) -> Option<Geometry<f64>> {
        match self {
            GeoValue::Point(c) => Some(Geometry::Point(geo_types::Point::from(*c))),
            GeoValue::MultiPoint(cs) => Some(Geometry::MultiPoint(geo_types::MultiPoint(
                cs.iter().copied().map(geo_types::Point::from).collect(),
            ))),
            GeoValue::LineString(cs) => {
                Some(Geometry::LineString(geo_types::LineString::new(cs.clone())))
            }
            GeoValue::MultiLineString(lines) => {
                Some(Geometry::MultiLineString(geo_types::MultiLineString(
                    lines
                        .iter()
                        .map(|l| geo_types::LineString::new(l.clone()))
                        .collect(),
                )))
            }
            GeoValue::Polygon(rings) => polygon_from_rings(rings).map(Geometry::Polygon),
            GeoValue::MultiPolygon(polys) => Some(Geometry::MultiPolygon(geo_types::MultiPolygon(
                polys.iter().filter_map(|p| polygon_from_rings(p)).collect(),
            ))),
            GeoValue::GeometryCollection(members) | GeoValue::FeatureCollection(members) => {
                Some(Geometry::GeometryCollection(geo_types::GeometryCollection(
                    members.iter().filter_map(GeoValue::to_geometry).collect(),
                )))
            }
            GeoValue::Feature(geometry) => geometry.as_ref().and_then(|g| g.to_geometry()),
        }
    }
}

impl Serialize for GeoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GeoValue::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Build a `geo_types` polygon; the first ring is the exterior.
pub(crate) fn polygon_from_rings(rings: &[Ring]) -> Option<geo_types::Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(geo_types::Polygon::new(
        geo_types::LineString::new(exterior.clone()),
        interiors
            .iter()
            .map(|r| geo_types::LineString::new(r.clone()))
            .collect(),
    ))
}

/// Parse a geometry object whose `type` member is `kind`.
fn geometry_from_object(obj: &Map<String, Value>, kind: &str) -> Option<GeoValue> {
    match kind {
        "Point" => coordinates(obj).and_then(parse_position).map(GeoValue::Point),
        "MultiPoint" => coordinates(obj)
            .and_then(|c| parse_members(c, parse_position))
            .map(GeoValue::MultiPoint),
        "LineString" => coordinates(obj)
            .and_then(parse_positions)
            .map(GeoValue::LineString),
        "MultiLineString" => coordinates(obj)
            .and_then(|c| parse_members(c, parse_positions))
            .map(GeoValue::MultiLineString),
        "Polygon" => coordinates(obj).and_then(parse_rings).map(GeoValue::Polygon),
        "MultiPolygon" => coordinates(obj)
            .and_then(|c| parse_members(c, parse_rings))
            .map(GeoValue::MultiPolygon),
        "GeometryCollection" => obj
            .get("geometries")
            .and_then(|g| parse_members(g, GeoValue::from_geometry_json))
            .map(GeoValue::GeometryCollection),
        _ => None,
    }
}

fn coordinates(obj: &Map<String, Value>) -> Option<&Value> {
    obj.get("coordinates")
}

fn parse_position(value: &Value) -> Option<Coord<f64>> {
    let parts = value.as_array()?;
    if parts.len() < 2 {
        return None;
    }
    let x = parts[0].as_f64()?;
    let y = parts[1].as_f64()?;
    (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
}

fn parse_positions(value: &Value) -> Option<Vec<Coord<f64>>> {
    value.as_array()?.iter().map(parse_position).collect()
}

fn parse_rings(value: &Value) -> Option<PolygonRings> {
    value.as_array()?.iter().map(parse_positions).collect()
}

/// Parse the members of a container, dropping the ones that fail.
fn parse_members<T>(value: &Value, parse: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    Some(value.as_array()?.iter().filter_map(parse).collect())
}

fn position(c: &Coord<f64>) -> Position {
    vec![c.x, c.y]
}

fn positions(cs: &[Coord<f64>]) -> Vec<Position> {
    cs.iter().map(position).collect()
}

fn ring_positions(rings: &[Ring]) -> Vec<Vec<Position>> {
    rings.iter().map(|r| positions(r)).collect()
}
