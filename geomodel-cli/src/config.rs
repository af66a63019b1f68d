use crate::error::{CliError, CliResult};
use geomodel_spatial::GeoModelConfig;
use std::path::Path;

/// Load the model config from `--config`, or the defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<GeoModelConfig> {
    let Some(path) = path else {
        return Ok(GeoModelConfig::default());
    };
    if !path.is_file() {
        return Err(CliError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let config = GeoModelConfig::load(path)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "loaded model config");
    Ok(config)
}
