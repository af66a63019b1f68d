use crate::cli::KindArg;
use crate::error::CliResult;
use geomodel_geojson::{project, GeometryKind};
use geomodel_spatial::GeoModelConfig;
use std::path::Path;

pub fn run(
    expr: Option<&str>,
    file: Option<&Path>,
    kinds: &[KindArg],
    config: &GeoModelConfig,
) -> CliResult<()> {
    let kinds: Vec<GeometryKind> = kinds.iter().copied().map(GeometryKind::from).collect();
    let projected = super::normalize::load(expr, file, config)?
        .and_then(|geometry| project(&geometry, &kinds));
    super::print_geometry(projected.as_ref());
    Ok(())
}
