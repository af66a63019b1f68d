pub mod normalize;
pub mod project;
pub mod query;
pub mod summary;

use geomodel_geojson::GeoValue;
use serde_json::Value;

/// Print an optional geometry as one JSON line (`null` if absent).
fn print_geometry(geometry: Option<&GeoValue>) {
    let json = geometry.map(GeoValue::to_json).unwrap_or(Value::Null);
    println!("{json}");
}
