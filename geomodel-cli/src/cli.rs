use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use geomodel_geojson::GeometryKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geomodel", about = "GeoJSON normalization and spatial queries", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a model config file (TOML, or JSON with a .json extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize GeoJSON into its canonical geometry
    Normalize {
        /// GeoJSON file (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Inline GeoJSON
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,
    },

    /// Normalize, then keep only the listed geometry kinds
    Project {
        /// GeoJSON file (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Inline GeoJSON
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,

        /// Geometry kind to keep (repeatable)
        #[arg(long = "kind", value_enum, required = true)]
        kinds: Vec<KindArg>,
    },

    /// Vertex-average centroid of the normalized geometry
    Centroid {
        /// GeoJSON file (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Inline GeoJSON
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,
    },

    /// Area/length-weighted center of the normalized geometry
    CenterOfMass {
        /// GeoJSON file (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Inline GeoJSON
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,
    },

    /// Run a spatial query over a JSON-lines record file
    #[command(group(
        ArgGroup::new("predicate")
            .required(true)
            .args(["within", "intersects", "near"])
    ))]
    Query {
        /// JSON-lines file, one record object per line
        #[arg(long)]
        records: PathBuf,

        /// Records lying within this GeoJSON geometry
        #[arg(long, value_name = "GEOJSON")]
        within: Option<String>,

        /// Records intersecting this GeoJSON geometry
        #[arg(long, value_name = "GEOJSON")]
        intersects: Option<String>,

        /// Records near the center of mass of this GeoJSON geometry
        #[arg(long, value_name = "GEOJSON")]
        near: Option<String>,

        /// Search radius in metres for --near
        #[arg(long, default_value_t = geomodel_spatial::DEFAULT_NEAR_DISTANCE)]
        distance: f64,

        /// Attribute filter applied after the spatial phase (field=json-value)
        #[arg(long = "where", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Maximum number of records to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Polygon,
    Point,
    LineString,
}

impl From<KindArg> for GeometryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Polygon => GeometryKind::Polygon,
            KindArg::Point => GeometryKind::Point,
            KindArg::LineString => GeometryKind::LineString,
        }
    }
}
