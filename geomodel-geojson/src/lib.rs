//! GeoJSON geometry normalization.
//!
//! Turns an arbitrary, possibly malformed GeoJSON value into a clean,
//! index-friendly geometry with at most one geometry per base kind.
//!
//! ```text
//!   GeoJSON value (Feature, FeatureCollection, any geometry, nested)
//!          │
//!          ▼
//!   decompose ──► GeometryBuckets { polygon, point, line_string }
//!          │
//!          ▼
//!   PolygonRepairer (dedup, close, drop degenerate, rewind)
//!          │
//!          ▼
//!   assemble ──► Polygon | MultiPolygon | Point | ... | GeometryCollection
//! ```
//!
//! Assembly is the inverse of decomposition: reassembling the buckets of an
//! already canonical value gives the same value back.
//!
//! # Modules
//!
//! - [`value`]: the `GeoValue` tagged union and lenient JSON parsing
//! - [`decompose`]: per-kind coordinate buckets
//! - [`repair`]: polygon ring cleaning and winding correction
//! - [`assemble`]: canonical reassembly
//! - [`summary`]: projection, centroid and center of mass
//! - [`error`]: error types

pub mod assemble;
pub mod decompose;
pub mod error;
pub mod repair;
pub mod summary;
pub mod value;

pub use assemble::assemble;
pub use decompose::{decompose, decompose_json, GeometryBuckets};
pub use error::{GeoJsonError, Result};
pub use repair::{PolygonRepairer, DEFAULT_TOLERANCE};
pub use summary::{center_of_mass, centroid, project};
pub use value::{GeoValue, GeometryKind, PolygonRings, Ring};

use serde_json::Value;

/// Decompose, repair and reassemble a geometry value.
///
/// `None` if nothing survives (no recognizable geometry, or only
/// degenerate polygons).
pub fn decompose_and_repair(value: &GeoValue, repairer: &PolygonRepairer) -> Option<GeoValue> {
    assemble(repairer.repair_buckets(decompose(Some(value))))
}

/// Normalize the raw content of a geometry attribute.
///
/// Accepts a GeoJSON object, a string holding GeoJSON text, or `null`.
/// `null` normalizes to `Ok(None)`. A string that is not JSON is a
/// `Json` error; a value that is not recognizable GeoJSON is a
/// `MalformedGeometry` error.
pub fn normalize_json(raw: &Value, repairer: &PolygonRepairer) -> Result<Option<GeoValue>> {
    let parsed;
    let value = match raw {
        Value::Null => return Ok(None),
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)?;
            if parsed.is_null() {
                return Ok(None);
            }
            &parsed
        }
        other => other,
    };
    let geometry = GeoValue::parse(value)?;
    Ok(decompose_and_repair(&geometry, repairer))
}
