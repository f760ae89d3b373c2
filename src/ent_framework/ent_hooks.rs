// Ent Hooks System - Middleware pattern for document mutations
// Before-hooks may rewrite the pending document; after-hooks observe the stored one.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    core::document_path::{get_path, set_path},
    ent_framework::ent_schema::now_timestamp,
    error::{AppError, AppResult},
    schemas::{content_schema::ContentSchema, EntSchema},
};

/// Hook context containing mutation information
#[derive(Debug, Clone)]
pub struct HookContext {
    pub collection: &'static str,
    pub operation: HookOperation,
    /// Document about to be written (before) or just written (after)
    pub data: Value,
    /// Currently persisted document, for updates
    pub previous: Option<Value>,
    pub metadata: HashMap<String, Value>,
}

impl HookContext {
    pub fn new(
        collection: &'static str,
        operation: HookOperation,
        data: Value,
        previous: Option<Value>,
    ) -> Self {
        Self {
            collection,
            operation,
            data,
            previous,
            metadata: HashMap::new(),
        }
    }
}

/// Types of operations that can trigger hooks
#[derive(Debug, Clone, PartialEq)]
pub enum HookOperation {
    Create,
    Update,
}

/// Hook execution timing
#[derive(Debug, Clone, PartialEq)]
pub enum HookTiming {
    Before,
    After,
}

/// Trait for implementing entity hooks
#[async_trait]
pub trait EntHook: Send + Sync {
    /// Execute the hook logic
    async fn execute(&self, ctx: &mut HookContext) -> AppResult<()>;

    /// Get hook name for debugging
    fn name(&self) -> &str;

    /// Get supported operations
    fn operations(&self) -> Vec<HookOperation>;

    /// Get hook timing
    fn timing(&self) -> HookTiming;
}

/// Hook registry for managing hooks per collection
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<&'static str, Vec<Box<dyn EntHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for a collection; hooks run in registration order
    pub fn register_hook(&mut self, collection: &'static str, hook: Box<dyn EntHook>) {
        self.hooks.entry(collection).or_default().push(hook);
    }

    /// Execute all applicable hooks for an operation
    pub async fn execute_hooks(&self, timing: HookTiming, ctx: &mut HookContext) -> AppResult<()> {
        if let Some(hooks) = self.hooks.get(ctx.collection) {
            for hook in hooks {
                if hook.operations().contains(&ctx.operation) && hook.timing() == timing {
                    hook.execute(ctx).await.map_err(|e| match e {
                        AppError::FieldValidation(_) => e,
                        other => AppError::Validation(format!(
                            "Hook '{}' failed: {}",
                            hook.name(),
                            other
                        )),
                    })?;
                }
            }
        }
        Ok(())
    }

    pub fn hook_names(&self, collection: &str) -> Vec<&str> {
        self.hooks
            .get(collection)
            .map(|hooks| hooks.iter().map(|h| h.name()).collect())
            .unwrap_or_default()
    }
}

/// Timestamp hook - sets createdAt/updatedAt, keeping createdAt immutable
pub struct TimestampHook;

#[async_trait]
impl EntHook for TimestampHook {
    async fn execute(&self, ctx: &mut HookContext) -> AppResult<()> {
        let now = Value::String(now_timestamp());

        match ctx.operation {
            HookOperation::Create => {
                set_path(&mut ctx.data, "createdAt", now.clone());
                set_path(&mut ctx.data, "updatedAt", now);
            }
            HookOperation::Update => {
                let created = ctx
                    .previous
                    .as_ref()
                    .and_then(|p| get_path(p, "createdAt"))
                    .cloned()
                    .unwrap_or_else(|| now.clone());
                set_path(&mut ctx.data, "createdAt", created);
                set_path(&mut ctx.data, "updatedAt", now);
            }
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "timestamp_hook"
    }

    fn operations(&self) -> Vec<HookOperation> {
        vec![HookOperation::Create, HookOperation::Update]
    }

    fn timing(&self) -> HookTiming {
        HookTiming::Before
    }
}

/// Content version hook.
/// New content starts at version 1. On update the version is derived from the
/// persisted document: +1 when `title` or `content` changed, unchanged otherwise.
pub struct ContentVersionHook;

impl ContentVersionHook {
    const VERSION_PATH: &'static str = "metadata.version";

    fn persisted_version(previous: &Value) -> i64 {
        get_path(previous, Self::VERSION_PATH)
            .and_then(Value::as_i64)
            .unwrap_or(1)
    }

    fn body_changed(previous: &Value, next: &Value) -> bool {
        ["title", "content"]
            .iter()
            .any(|field| get_path(previous, field) != get_path(next, field))
    }
}

#[async_trait]
impl EntHook for ContentVersionHook {
    async fn execute(&self, ctx: &mut HookContext) -> AppResult<()> {
        let version = match (&ctx.operation, &ctx.previous) {
            (HookOperation::Update, Some(previous)) => {
                let current = Self::persisted_version(previous);
                if Self::body_changed(previous, &ctx.data) {
                    current + 1
                } else {
                    current
                }
            }
            _ => 1,
        };
        set_path(&mut ctx.data, Self::VERSION_PATH, Value::from(version));
        Ok(())
    }

    fn name(&self) -> &str {
        "content_version_hook"
    }

    fn operations(&self) -> Vec<HookOperation> {
        vec![HookOperation::Create, HookOperation::Update]
    }

    fn timing(&self) -> HookTiming {
        HookTiming::Before
    }
}

/// Audit log hook - records every committed mutation
pub struct AuditLogHook;

#[async_trait]
impl EntHook for AuditLogHook {
    async fn execute(&self, ctx: &mut HookContext) -> AppResult<()> {
        let id = get_path(&ctx.data, "_id")
            .and_then(Value::as_str)
            .unwrap_or("<unassigned>");
        tracing::info!(
            collection = ctx.collection,
            operation = ?ctx.operation,
            document_id = id,
            "document mutation committed"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "audit_log_hook"
    }

    fn operations(&self) -> Vec<HookOperation> {
        vec![HookOperation::Create, HookOperation::Update]
    }

    fn timing(&self) -> HookTiming {
        HookTiming::After
    }
}

/// Create default hook registry with common hooks
pub fn create_default_hook_registry() -> HookRegistry {
    let mut registry = HookRegistry::new();

    for collection in crate::schemas::create_schema_registry().collections() {
        registry.register_hook(collection, Box::new(TimestampHook));
        if collection == ContentSchema::collection() {
            registry.register_hook(collection, Box::new(ContentVersionHook));
        }
        registry.register_hook(collection, Box::new(AuditLogHook));
    }

    registry
}
