use crate::error::CliResult;
use geomodel_geojson::{center_of_mass, centroid, GeoValue};
use geomodel_spatial::GeoModelConfig;
use std::path::Path;

/// Which point summary to print.
#[derive(Clone, Copy)]
pub enum Summary {
    Centroid,
    CenterOfMass,
}

pub fn run(
    summary: Summary,
    expr: Option<&str>,
    file: Option<&Path>,
    config: &GeoModelConfig,
) -> CliResult<()> {
    let point = super::normalize::load(expr, file, config)?
        .and_then(|geometry| match summary {
            Summary::Centroid => centroid(&geometry),
            Summary::CenterOfMass => center_of_mass(&geometry),
        })
        .map(GeoValue::Point);
    super::print_geometry(point.as_ref());
    Ok(())
}
