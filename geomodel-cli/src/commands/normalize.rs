use crate::error::CliResult;
use crate::input::read_json;
use geomodel_geojson::{normalize_json, GeoValue, PolygonRepairer};
use geomodel_spatial::GeoModelConfig;
use std::path::Path;

/// Read GeoJSON input and normalize it with the configured tolerance.
pub fn load(
    expr: Option<&str>,
    file: Option<&Path>,
    config: &GeoModelConfig,
) -> CliResult<Option<GeoValue>> {
    let raw = read_json(expr, file)?;
    let normalized = normalize_json(&raw, &PolygonRepairer::new(config.tolerance))?;
    tracing::info!(
        kind = normalized.as_ref().map_or("none", GeoValue::type_name),
        "normalized input"
    );
    Ok(normalized)
}

pub fn run(expr: Option<&str>, file: Option<&Path>, config: &GeoModelConfig) -> CliResult<()> {
    let normalized = load(expr, file, config)?;
    super::print_geometry(normalized.as_ref());
    Ok(())
}
