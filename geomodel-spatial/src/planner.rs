//! Two-phase spatial queries.
//!
//! Phase one asks the [`SpatialIndex`] for matching record ids. Phase two
//! is an ordinary [`RecordQuery`] restricted to those ids, which the caller
//! may refine before executing.
//!
//! The two phases do not share a snapshot: a record written between them
//! can appear in, or vanish from, the final result.

use crate::error::Result;
use crate::index::{SpatialIndex, SpatialPredicate};
use crate::store::{RecordQuery, RecordStore};
use std::sync::Arc;

/// A spatial query whose index phase has not run yet.
#[derive(Debug, Clone)]
pub struct DeferredQuery {
    index: Arc<dyn SpatialIndex>,
    store: Arc<dyn RecordStore>,
    field: String,
    predicate: SpatialPredicate,
}

impl DeferredQuery {
    pub fn new(
        index: Arc<dyn SpatialIndex>,
        store: Arc<dyn RecordStore>,
        field: impl Into<String>,
        predicate: SpatialPredicate,
    ) -> Self {
        Self {
            index,
            store,
            field: field.into(),
            predicate,
        }
    }

    pub fn predicate(&self) -> &SpatialPredicate {
        &self.predicate
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Run the index phase and return the record query for phase two.
    ///
    /// Index failures propagate; they never turn into an empty result.
    /// No matches yields a query that returns nothing.
    pub async fn resolve(&self) -> Result<RecordQuery> {
        let ids = self.index.find(&self.field, &self.predicate).await?;
        tracing::debug!(
            field = %self.field,
            predicate = %self.predicate,
            matched = ids.len(),
            "spatial index phase complete"
        );
        Ok(RecordQuery::by_ids(Arc::clone(&self.store), ids))
    }
}
