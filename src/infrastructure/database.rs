// Database Interface - document store operations used by the entity layer
// Documents are JSON objects grouped into collections, addressed by `_id`
// and optionally by a per-collection unique key.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::DocumentId;
use crate::ent_framework::ent_schema::{SchemaDefinition, TextIndexDefinition};
use crate::error::AppResult;

/// A document as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Value,
    /// Relevance score, present only for text-search results
    pub text_score: Option<f64>,
}

/// Equality-style predicates over dot paths
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl FieldFilter {
    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        FieldFilter::Eq(path.to_string(), value.into())
    }

    pub fn one_of(path: &str, values: Vec<Value>) -> Self {
        FieldFilter::In(path.to_string(), values)
    }

    pub fn path(&self) -> &str {
        match self {
            FieldFilter::Eq(path, _) | FieldFilter::In(path, _) => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub path: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            descending: false,
        }
    }

    pub fn desc(path: &str) -> Self {
        Self {
            path: path.to_string(),
            descending: true,
        }
    }
}

/// Free-text search against a weighted text index
#[derive(Debug, Clone)]
pub struct TextQuery {
    pub terms: String,
    pub index: TextIndexDefinition,
}

/// Collection query. When `text` is set, only documents with a positive
/// score are returned, ordered by score and then by `sort`.
#[derive(Debug, Clone, Default)]
pub struct DocQuery {
    pub filters: Vec<FieldFilter>,
    pub sort: Vec<SortKey>,
    pub limit: Option<usize>,
    pub text: Option<TextQuery>,
}

impl DocQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn text(mut self, terms: &str, index: TextIndexDefinition) -> Self {
        self.text = Some(TextQuery {
            terms: terms.to_string(),
            index,
        });
        self
    }
}

/// Counter mutation applied atomically to a single document
#[derive(Debug, Clone, Default)]
pub struct CounterUpdate {
    pub increments: Vec<(String, i64)>,
    pub sets: Vec<(String, Value)>,
}

impl CounterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(mut self, path: &str, delta: i64) -> Self {
        self.increments.push((path.to_string(), delta));
        self
    }

    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.sets.push((path.to_string(), value.into()));
        self
    }
}

/// Database interface trait for document operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the secondary indexes a schema declares
    async fn ensure_collection(&self, schema: &SchemaDefinition) -> AppResult<()>;

    /// Insert a new document; assigns and returns its `_id`.
    /// A duplicate unique key is reported as a conflict.
    async fn insert(
        &self,
        collection: &str,
        unique_key: Option<&str>,
        data: Value,
    ) -> AppResult<StoredDocument>;

    async fn get(&self, collection: &str, id: &DocumentId) -> AppResult<Option<StoredDocument>>;

    async fn get_by_unique_key(
        &self,
        collection: &str,
        key: &str,
    ) -> AppResult<Option<StoredDocument>>;

    /// Query a collection; malformed filters or store failures are `QueryFailed`
    async fn find(&self, collection: &str, query: &DocQuery) -> AppResult<Vec<StoredDocument>>;

    /// Replace the whole document; None when no such document exists
    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        unique_key: Option<&str>,
        data: Value,
    ) -> AppResult<Option<StoredDocument>>;

    /// Apply counter increments and field sets in a single statement
    async fn apply_counters(
        &self,
        collection: &str,
        id: &DocumentId,
        update: &CounterUpdate,
    ) -> AppResult<Option<StoredDocument>>;

    /// Health check to verify database connectivity
    async fn health_check(&self) -> AppResult<()>;
}
