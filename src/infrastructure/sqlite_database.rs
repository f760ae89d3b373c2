use std::str::FromStr;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row,
};

use crate::core::document_path::is_valid_path;
use crate::core::DocumentId;
use crate::ent_framework::ent_schema::SchemaDefinition;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{
    CounterUpdate, DocQuery, DocumentStore, FieldFilter, StoredDocument,
};
use crate::infrastructure::text_search::{score_document, tokenize_query};

static SQL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid name regex"));

/// SQLite implementation of the document store.
/// Every collection shares one `documents` table; each row holds one JSON document.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid database URL {}: {}", url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to {}: {}", url, e)))?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// In-memory store for tests and demos. Pinned to a single connection that
    /// never expires, since every SQLite memory connection is its own database.
    pub async fn new_in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            AppError::DatabaseError(format!("Failed to configure in-memory SQLite: {}", e))
        })?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e))
            })?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// Create the documents table
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                collection TEXT NOT NULL,
                unique_key TEXT,
                data TEXT NOT NULL,
                UNIQUE (collection, unique_key)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create collection index: {}", e))
            })?;

        Ok(())
    }

    fn decode_row(row: &SqliteRow) -> AppResult<StoredDocument> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::DatabaseError(format!("Failed to read document id: {}", e)))?;
        let raw: String = row
            .try_get("data")
            .map_err(|e| AppError::DatabaseError(format!("Failed to read document {}: {}", id, e)))?;
        let data = serde_json::from_str(&raw).map_err(|e| {
            AppError::SerializationError(format!("Stored document {} is not valid JSON: {}", id, e))
        })?;
        Ok(StoredDocument {
            id: DocumentId::new(id),
            data,
            text_score: None,
        })
    }

    fn with_id(mut data: Value, id: &DocumentId) -> AppResult<Value> {
        match data.as_object_mut() {
            Some(object) => {
                object.insert("_id".to_string(), Value::String(id.to_string()));
                Ok(data)
            }
            None => Err(AppError::Validation("Document must be a JSON object".to_string())),
        }
    }

    fn write_error(collection: &str, unique_key: Option<&str>, err: sqlx::Error) -> AppError {
        let duplicate = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            AppError::Conflict(format!(
                "A {} document with key '{}' already exists",
                collection,
                unique_key.unwrap_or_default()
            ))
        } else {
            AppError::DatabaseError(format!("Failed to write {} document: {}", collection, err))
        }
    }
}

/// Collection names are embedded in SQL so partial indexes can be used
fn sql_name(name: &str) -> AppResult<&str> {
    if SQL_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(AppError::QueryFailed(format!("Invalid collection or index name '{}'", name)))
    }
}

fn json_expr(path: &str) -> AppResult<String> {
    if is_valid_path(path) {
        Ok(format!("json_extract(data, '$.{}')", path))
    } else {
        Err(AppError::QueryFailed(format!("Invalid field path '{}'", path)))
    }
}

fn push_scalar(qb: &mut QueryBuilder<'_, Sqlite>, path: &str, value: &Value) -> AppResult<()> {
    match value {
        Value::Bool(b) => {
            qb.push_bind(i64::from(*b));
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => {
                qb.push_bind(i);
            }
            None => {
                qb.push_bind(n.as_f64().unwrap_or_default());
            }
        },
        Value::String(s) => {
            qb.push_bind(s.clone());
        }
        _ => {
            return Err(AppError::QueryFailed(format!(
                "Filter on '{}' must compare against a scalar value",
                path
            )))
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn ensure_collection(&self, schema: &SchemaDefinition) -> AppResult<()> {
        let collection = sql_name(schema.collection)?;

        for index in &schema.indexes {
            let name = sql_name(&index.name)?;
            let columns = index
                .fields
                .iter()
                .map(|field| json_expr(field))
                .collect::<AppResult<Vec<_>>>()?
                .join(", ");
            let statement = format!(
                "CREATE {}INDEX IF NOT EXISTS {}_{} ON documents({}) WHERE collection = '{}'",
                if index.unique { "UNIQUE " } else { "" },
                collection,
                name,
                columns,
                collection
            );
            sqlx::query(&statement).execute(&self.pool).await.map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to create index {} on {}: {}",
                    name, collection, e
                ))
            })?;
        }

        tracing::debug!(collection, indexes = schema.indexes.len(), "collection ready");
        Ok(())
    }

    async fn insert(
        &self,
        collection: &str,
        unique_key: Option<&str>,
        data: Value,
    ) -> AppResult<StoredDocument> {
        let id = DocumentId::generate();
        let data = Self::with_id(data, &id)?;
        let raw = serde_json::to_string(&data)?;

        sqlx::query("INSERT INTO documents (id, collection, unique_key, data) VALUES (?, ?, ?, ?)")
            .bind(id.as_str())
            .bind(collection)
            .bind(unique_key)
            .bind(raw)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::write_error(collection, unique_key, e))?;

        Ok(StoredDocument {
            id,
            data,
            text_score: None,
        })
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> AppResult<Option<StoredDocument>> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::QueryFailed(format!("Failed to get {} document {}: {}", collection, id, e))
            })?;

        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn get_by_unique_key(
        &self,
        collection: &str,
        key: &str,
    ) -> AppResult<Option<StoredDocument>> {
        let row =
            sqlx::query("SELECT id, data FROM documents WHERE collection = ? AND unique_key = ?")
                .bind(collection)
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::QueryFailed(format!(
                        "Failed to get {} document '{}': {}",
                        collection, key, e
                    ))
                })?;

        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn find(&self, collection: &str, query: &DocQuery) -> AppResult<Vec<StoredDocument>> {
        let collection = sql_name(collection)?;
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT id, data FROM documents WHERE collection = '{}'",
            collection
        ));

        for filter in &query.filters {
            let expr = json_expr(filter.path())?;
            match filter {
                FieldFilter::Eq(_, Value::Null) => {
                    qb.push(format!(" AND {} IS NULL", expr));
                }
                FieldFilter::Eq(path, value) => {
                    qb.push(format!(" AND {} = ", expr));
                    push_scalar(&mut qb, path, value)?;
                }
                FieldFilter::In(_, values) if values.is_empty() => {
                    qb.push(" AND 0");
                }
                FieldFilter::In(path, values) => {
                    qb.push(format!(" AND {} IN (", expr));
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            qb.push(", ");
                        }
                        push_scalar(&mut qb, path, value)?;
                    }
                    qb.push(")");
                }
            }
        }

        qb.push(" ORDER BY ");
        for key in &query.sort {
            qb.push(format!(
                "{} {}, ",
                json_expr(&key.path)?,
                if key.descending { "DESC" } else { "ASC" }
            ));
        }
        qb.push("seq ASC");

        // Text queries are limited after scoring
        if let (Some(limit), None) = (query.limit, &query.text) {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            AppError::QueryFailed(format!("Failed to query {}: {}", collection, e))
        })?;

        let mut documents = rows
            .iter()
            .map(Self::decode_row)
            .collect::<AppResult<Vec<_>>>()?;

        if let Some(text) = &query.text {
            let terms = tokenize_query(&text.terms);
            documents = documents
                .into_iter()
                .filter_map(|mut doc| {
                    let score = score_document(&doc.data, &text.index, &terms);
                    (score > 0.0).then(|| {
                        doc.text_score = Some(score);
                        doc
                    })
                })
                .collect();
            // Stable sort keeps the SQL ordering as the tie-breaker
            documents.sort_by(|a, b| {
                b.text_score
                    .unwrap_or_default()
                    .total_cmp(&a.text_score.unwrap_or_default())
            });
            if let Some(limit) = query.limit {
                documents.truncate(limit);
            }
        }

        Ok(documents)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        unique_key: Option<&str>,
        data: Value,
    ) -> AppResult<Option<StoredDocument>> {
        let data = Self::with_id(data, id)?;
        let raw = serde_json::to_string(&data)?;

        let result = sqlx::query(
            "UPDATE documents SET data = ?, unique_key = ? WHERE collection = ? AND id = ?",
        )
        .bind(raw)
        .bind(unique_key)
        .bind(collection)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(collection, unique_key, e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(StoredDocument {
            id: id.clone(),
            data,
            text_score: None,
        }))
    }

    async fn apply_counters(
        &self,
        collection: &str,
        id: &DocumentId,
        update: &CounterUpdate,
    ) -> AppResult<Option<StoredDocument>> {
        if update.increments.is_empty() && update.sets.is_empty() {
            return self.get(collection, id).await;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE documents SET data = json_set(data");
        for (path, delta) in &update.increments {
            let expr = json_expr(path)?;
            qb.push(format!(", '$.{}', COALESCE({}, 0) + ", path, expr));
            qb.push_bind(*delta);
        }
        for (path, value) in &update.sets {
            json_expr(path)?;
            qb.push(format!(", '$.{}', json(", path));
            qb.push_bind(serde_json::to_string(value)?);
            qb.push(")");
        }
        qb.push(") WHERE collection = ");
        qb.push_bind(collection.to_string());
        qb.push(" AND id = ");
        qb.push_bind(id.to_string());

        let result = qb.build().execute(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(format!(
                "Failed to update counters on {} document {}: {}",
                collection, id, e
            ))
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(collection, id).await
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;
        Ok(())
    }
}
