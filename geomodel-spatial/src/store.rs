//! Primary record store seam and refinable queries.
//!
//! The store owns records; this crate only decides which ids a spatial
//! predicate selects. Phase two of a spatial query is a [`RecordQuery`]
//! scoped to those ids, which callers can refine (`where_eq`, `sort`,
//! `skip`, `limit`) before running it with [`RecordQuery::exec`].

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

/// Record identifier.
pub type RecordId = u64;

/// Record attributes (a JSON object without the id).
pub type Attributes = Map<String, Value>;

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Record {
    /// Create a record.
    pub fn new(id: RecordId, attributes: Attributes) -> Self {
        Self { id, attributes }
    }

    /// Get an attribute value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }
}

/// Which record ids a query may return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdFilter {
    /// No id restriction.
    #[default]
    Any,
    /// Only these ids; an empty set matches nothing.
    Only(Vec<RecordId>),
}

impl IdFilter {
    /// Check if an id passes the filter.
    pub fn contains(&self, id: RecordId) -> bool {
        match self {
            IdFilter::Any => true,
            IdFilter::Only(ids) => ids.contains(&id),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query criteria handed to a [`RecordStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCriteria {
    pub ids: IdFilter,
    /// Attribute equality filters, all of which must hold.
    pub filters: Vec<(String, Value)>,
    /// Sort keys, most significant first.
    pub sort: Vec<(String, SortOrder)>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl QueryCriteria {
    /// Check the id and attribute filters against one record.
    pub fn matches(&self, record: &Record) -> bool {
        self.ids.contains(record.id)
            && self
                .filters
                .iter()
                .all(|(field, expected)| record.get(field) == Some(expected))
    }

    /// Filter, sort and page a set of records.
    ///
    /// Helper for stores that evaluate criteria in memory. Without sort
    /// keys, an id-restricted query returns records in the order the ids
    /// were given (nearest first for `near`). Records with equal sort keys
    /// keep that order.
    pub fn apply(&self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        let mut matched: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        if let IdFilter::Only(ids) = &self.ids {
            matched.sort_by_key(|r| ids.iter().position(|id| *id == r.id));
        }
        if !self.sort.is_empty() {
            matched.sort_by(|a, b| {
                self.sort
                    .iter()
                    .map(|(field, order)| {
                        let ord = compare_values(a.get(field), b.get(field));
                        match order {
                            SortOrder::Asc => ord,
                            SortOrder::Desc => ord.reverse(),
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }
        matched
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Order JSON values: missing/null, then booleans, numbers, strings, and
/// everything else (compared by its JSON text).
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => match rank(a).cmp(&rank(b)) {
            Ordering::Equal if rank(a) == 4 => a.map(Value::to_string).cmp(&b.map(Value::to_string)),
            ord => ord,
        },
    }
}

/// Primary record store.
///
/// Implementations execute queries lazily: nothing runs until
/// [`RecordStore::execute`] is called with the final criteria.
#[async_trait]
pub trait RecordStore: Debug + Send + Sync {
    /// Insert a record, assigning it a fresh id.
    async fn insert(&self, attributes: Attributes) -> Result<Record>;

    /// Shallow-merge `patch` into a record; `None` if the id is unknown.
    async fn update(&self, id: RecordId, patch: Attributes) -> Result<Option<Record>>;

    /// Delete a record; returns whether it existed.
    async fn destroy(&self, id: RecordId) -> Result<bool>;

    /// Fetch one record.
    async fn get(&self, id: RecordId) -> Result<Option<Record>>;

    /// Run a query.
    async fn execute(&self, criteria: &QueryCriteria) -> Result<Vec<Record>>;
}

/// An unexecuted, refinable query against a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct RecordQuery {
    store: Arc<dyn RecordStore>,
    criteria: QueryCriteria,
}

impl RecordQuery {
    /// Query every record in the store.
    pub fn all(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            criteria: QueryCriteria::default(),
        }
    }

    /// Query exactly these ids. An empty list matches nothing.
    pub fn by_ids(store: Arc<dyn RecordStore>, ids: Vec<RecordId>) -> Self {
        Self {
            store,
            criteria: QueryCriteria {
                ids: IdFilter::Only(ids),
                ..Default::default()
            },
        }
    }

    /// Require `field == value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.filters.push((field.into(), value.into()));
        self
    }

    /// Add a sort key.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.criteria.sort.push((field.into(), order));
        self
    }

    /// Skip the first `n` results.
    pub fn skip(mut self, n: usize) -> Self {
        self.criteria.skip = n;
        self
    }

    /// Return at most `n` results.
    pub fn limit(mut self, n: usize) -> Self {
        self.criteria.limit = Some(n);
        self
    }

    /// The criteria built so far.
    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    /// Execute the query.
    pub async fn exec(&self) -> Result<Vec<Record>> {
        self.store.execute(&self.criteria).await
    }
}
