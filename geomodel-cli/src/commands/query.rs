use crate::error::{CliError, CliResult};
use geomodel_geojson::GeoValue;
use geomodel_spatial::{GeoModel, GeoModelConfig, MemoryGeoStore};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// The spatial predicate picked on the command line.
pub enum Predicate<'a> {
    Within(&'a str),
    Intersects(&'a str),
    Near { geometry: &'a str, distance: f64 },
}

pub struct QueryOpts<'a> {
    pub records: &'a Path,
    pub predicate: Predicate<'a>,
    pub filters: &'a [String],
    pub limit: Option<usize>,
}

pub async fn run(opts: QueryOpts<'_>, config: GeoModelConfig) -> CliResult<()> {
    let store = MemoryGeoStore::new();
    let model = GeoModel::new(config, Arc::new(store.clone()), Arc::new(store))?;

    let loaded = load_records(&model, opts.records).await?;
    tracing::info!(records = loaded, "loaded records");
    model.create_spatial_index().await?;

    let deferred = match opts.predicate {
        Predicate::Within(text) => model.find_within(&parse_geometry(text)?),
        Predicate::Intersects(text) => model.find_intersects(&parse_geometry(text)?),
        Predicate::Near { geometry, distance } => model
            .find_near(&parse_geometry(geometry)?, distance)
            .ok_or_else(|| {
                CliError::Input("--near geometry has no center point".to_string())
            })?,
    };

    let mut query = deferred.resolve().await?;
    for filter in opts.filters {
        let (field, value) = parse_filter(filter)?;
        query = query.where_eq(field, value);
    }
    if let Some(limit) = opts.limit {
        query = query.limit(limit);
    }

    for record in query.exec().await? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

/// Create one record per non-blank line, through the model's write hooks.
async fn load_records(model: &GeoModel, path: &Path) -> CliResult<usize> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display())))?;
    let mut count = 0;
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let attributes = match serde_json::from_str::<Value>(line)? {
            Value::Object(map) => map,
            _ => {
                return Err(CliError::Input(format!(
                    "{}:{}: record is not a JSON object",
                    path.display(),
                    line_no + 1
                )))
            }
        };
        model.create(attributes).await?;
        count += 1;
    }
    Ok(count)
}

fn parse_geometry(text: &str) -> CliResult<GeoValue> {
    Ok(GeoValue::from_json_str(text)?)
}

/// Split `field=value`; the value is JSON if it parses, a string otherwise.
fn parse_filter(filter: &str) -> CliResult<(&str, Value)> {
    let (field, raw) = filter
        .split_once('=')
        .ok_or_else(|| CliError::Usage(format!("--where expects FIELD=VALUE, got '{filter}'")))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field, value))
}
