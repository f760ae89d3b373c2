// Entity Trait - typed documents plus the repository that persists them
// Every write goes through the same pipeline: defaults, before-hooks,
// schema validation, store write, after-hooks.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::core::document_path::get_path;
use crate::core::DocumentId;
use crate::ent_framework::ent_hooks::{HookContext, HookOperation, HookRegistry, HookTiming};
use crate::ent_framework::ent_schema::{EntSchema, SchemaDefinition};
use crate::error::{AppError, AppResult, FieldError};
use crate::infrastructure::database::{CounterUpdate, DocQuery, DocumentStore, StoredDocument};

/// Entity trait that all typed documents implement
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Schema: EntSchema;

    /// Store-assigned id; None only before the first write
    fn id(&self) -> Option<&DocumentId>;

    fn collection() -> &'static str {
        Self::Schema::collection()
    }
}

/// Schema-aware persistence for one entity type
pub struct EntRepository<E: Entity> {
    store: Arc<dyn DocumentStore>,
    hooks: Arc<HookRegistry>,
    schema: Arc<SchemaDefinition>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hooks: self.hooks.clone(),
            schema: self.schema.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntRepository<E> {
    pub fn new(store: Arc<dyn DocumentStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            store,
            hooks,
            schema: Arc::new(SchemaDefinition::of::<E::Schema>()),
            _entity: PhantomData,
        }
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn decode(doc: StoredDocument) -> AppResult<E> {
        serde_json::from_value(doc.data).map_err(|e| {
            AppError::SerializationError(format!(
                "Stored {} document {} is malformed: {}",
                E::collection(),
                doc.id,
                e
            ))
        })
    }

    fn unique_key(&self, data: &Value) -> Option<String> {
        self.schema
            .unique_field()
            .and_then(|field| get_path(data, field))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Defaults, before-hooks and validation for a pending write
    async fn prepare(
        &self,
        operation: HookOperation,
        mut data: Value,
        previous: Option<Value>,
    ) -> AppResult<Value> {
        match data.as_object_mut() {
            Some(object) => {
                object.remove("_id");
            }
            None => {
                return Err(AppError::FieldValidation(vec![FieldError::new(
                    "$",
                    "document must be a JSON object",
                )]))
            }
        }

        self.schema.apply_defaults(&mut data);

        let mut ctx = HookContext::new(self.schema.collection, operation, data, previous);
        self.hooks.execute_hooks(HookTiming::Before, &mut ctx).await?;

        let errors = self.schema.validate(&ctx.data);
        if !errors.is_empty() {
            return Err(AppError::FieldValidation(errors));
        }

        // Shape check against the typed entity before anything is written
        serde_json::from_value::<E>(ctx.data.clone()).map_err(|e| {
            AppError::Validation(format!("Invalid {} document: {}", E::collection(), e))
        })?;

        Ok(ctx.data)
    }

    async fn committed(&self, operation: HookOperation, stored: StoredDocument) -> AppResult<E> {
        let mut ctx = HookContext::new(self.schema.collection, operation, stored.data, None);
        self.hooks.execute_hooks(HookTiming::After, &mut ctx).await?;
        Self::decode(StoredDocument {
            id: stored.id,
            data: ctx.data,
            text_score: stored.text_score,
        })
    }

    /// Create a new entity from raw input
    pub async fn gen_create(&self, data: Value) -> AppResult<E> {
        let data = self.prepare(HookOperation::Create, data, None).await?;
        let key = self.unique_key(&data);

        let stored = self
            .store
            .insert(self.schema.collection, key.as_deref(), data)
            .await?;
        self.committed(HookOperation::Create, stored).await
    }

    /// Load entity by id - returns None if not found
    pub async fn gen_nullable(&self, id: &DocumentId) -> AppResult<Option<E>> {
        self.store
            .get(self.schema.collection, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Load entity by id - errors if not found
    pub async fn gen_enforce(&self, id: &DocumentId) -> AppResult<E> {
        self.gen_nullable(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} document {} not found", E::collection(), id))
        })
    }

    pub async fn gen_by_unique(&self, key: &str) -> AppResult<Option<E>> {
        self.store
            .get_by_unique_key(self.schema.collection, key)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn gen_query(&self, query: &DocQuery) -> AppResult<Vec<E>> {
        self.store
            .find(self.schema.collection, query)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Replace a stored entity with `data`, running the update pipeline
    pub async fn gen_save(&self, id: &DocumentId, data: Value) -> AppResult<E> {
        let previous = self
            .store
            .get(self.schema.collection, id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} document {} not found", E::collection(), id))
            })?;

        let data = self
            .prepare(HookOperation::Update, data, Some(previous.data))
            .await?;
        let key = self.unique_key(&data);

        let stored = self
            .store
            .replace(self.schema.collection, id, key.as_deref(), data)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} document {} not found", E::collection(), id))
            })?;
        self.committed(HookOperation::Update, stored).await
    }

    /// Update the document holding `key`, or create it
    pub async fn gen_upsert_by_unique(&self, key: &str, data: Value) -> AppResult<E> {
        let existing = self
            .store
            .get_by_unique_key(self.schema.collection, key)
            .await?;
        match existing {
            Some(doc) => self.gen_save(&doc.id, data).await,
            None => self.gen_create(data).await,
        }
    }

    /// Atomic counter update; hooks are not run
    pub async fn gen_apply_counters(
        &self,
        id: &DocumentId,
        update: &CounterUpdate,
    ) -> AppResult<Option<E>> {
        self.store
            .apply_counters(self.schema.collection, id, update)
            .await?
            .map(Self::decode)
            .transpose()
    }
}
