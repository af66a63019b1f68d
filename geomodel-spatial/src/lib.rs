//! Spatial models over GeoJSON records.
//!
//! A [`GeoModel`] keeps a normalized copy of each record's GeoJSON attribute
//! in a derived features field and answers spatial queries against it in two
//! phases: a [`SpatialIndex`] lookup for ids, then a refinable
//! [`RecordQuery`] on the [`RecordStore`].
//!
//! ```text
//!   create/update payload
//!          │  WriteHook (DerivedFieldSynchronizer, PointFieldSynchronizer)
//!          ▼
//!   RecordStore ◄──── RecordQuery (phase two: ids + where/sort/skip/limit)
//!          ▲
//!   SpatialIndex ──► ids (phase one: within / intersects / near)
//! ```
//!
//! [`MemoryGeoStore`] implements both collaborator traits in memory.

pub mod config;
pub mod distance;
pub mod error;
pub mod index;
pub mod memory;
pub mod model;
pub mod planner;
pub mod store;
pub mod sync;

pub use config::{GeoModelConfig, PointFieldConfig};
pub use error::{Result, SpatialError};
pub use index::{SpatialIndex, SpatialPredicate};
pub use memory::MemoryGeoStore;
pub use model::{GeoModel, DEFAULT_NEAR_DISTANCE};
pub use planner::DeferredQuery;
pub use store::{
    Attributes, IdFilter, QueryCriteria, Record, RecordId, RecordQuery, RecordStore, SortOrder,
};
pub use sync::{DerivedFieldSynchronizer, PointFieldSynchronizer, WriteHook};
