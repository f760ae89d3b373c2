// ContentService - visibility-aware reads and permission-checked edits of CMS content

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::{
    core::{
        document_path::{merge, set_path},
        ViewerRole,
    },
    ent_framework::{ent_schema::now_timestamp, EntRepository, Entity, HookRegistry},
    entities::{Content, ContentType, LocalizedContent},
    error::{AppError, AppResult},
    infrastructure::database::{CounterUpdate, DocQuery, DocumentStore, FieldFilter},
};

/// Fields a save may never overwrite
const PROTECTED_FIELDS: &[&str] = &["_id", "createdAt", "updatedAt", "analytics"];

#[derive(Clone)]
pub struct ContentService {
    contents: EntRepository<Content>,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            contents: EntRepository::new(store, hooks),
        }
    }

    pub async fn create(&self, data: Value) -> AppResult<Content> {
        let content = self.contents.gen_create(data).await?;
        tracing::info!(identifier = %content.identifier, content_type = %content.content_type, "content created");
        Ok(content)
    }

    /// Active content of one type, filtered for the caller after loading
    pub async fn get_by_type(
        &self,
        content_type: ContentType,
        role: &ViewerRole,
    ) -> AppResult<Vec<Content>> {
        let query = DocQuery::new()
            .filter(FieldFilter::eq("type", content_type.as_str()))
            .filter(FieldFilter::eq("visibility.isActive", true));
        let candidates = self
            .contents
            .gen_query(&query)
            .await
            .map_err(Self::query_failed)?;

        let now = Utc::now();
        Ok(candidates
            .into_iter()
            .filter(|content| content.is_visible_at(role, now))
            .collect())
    }

    /// None when absent or not visible to the caller
    pub async fn get_by_identifier(
        &self,
        identifier: &str,
        role: &ViewerRole,
    ) -> AppResult<Option<Content>> {
        Ok(self
            .contents
            .gen_by_unique(identifier)
            .await
            .map_err(Self::query_failed)?
            .filter(|content| content.is_visible_to_user(role)))
    }

    // Lookups report every store or decode failure as QueryFailed
    fn query_failed(e: AppError) -> AppError {
        match e {
            AppError::QueryFailed(_) => e,
            other => AppError::QueryFailed(other.to_string()),
        }
    }

    pub async fn get_localized_by_identifier(
        &self,
        identifier: &str,
        role: &ViewerRole,
        language: &str,
    ) -> AppResult<Option<LocalizedContent>> {
        Ok(self
            .get_by_identifier(identifier, role)
            .await?
            .map(|content| content.get_localized_content(language)))
    }

    /// Merge `changes` into the stored document and persist it.
    /// Requires edit permission; analytics and audit fields are ignored.
    pub async fn save(
        &self,
        identifier: &str,
        changes: Value,
        role: &ViewerRole,
        modified_by: Option<&str>,
    ) -> AppResult<Content> {
        let stored = self
            .contents
            .store()
            .get_by_unique_key(Content::collection(), identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content '{}' not found", identifier)))?;

        let existing: Content = serde_json::from_value(stored.data.clone())?;
        if !existing.can_user_edit(role) {
            return Err(AppError::Forbidden(format!(
                "Role '{}' cannot edit content '{}'",
                role, identifier
            )));
        }

        let mut changes = match changes {
            Value::Object(map) => map,
            _ => return Err(AppError::BadRequest("Changes must be a JSON object".to_string())),
        };
        for field in PROTECTED_FIELDS {
            changes.remove(*field);
        }

        let mut document = stored.data;
        merge(&mut document, Value::Object(changes));
        if let Some(user) = modified_by {
            set_path(&mut document, "metadata.lastModifiedBy", Value::from(user));
        }

        let saved = self.contents.gen_save(&stored.id, document).await?;
        tracing::info!(
            identifier = %saved.identifier,
            version = saved.metadata.version,
            role = %role,
            "content saved"
        );
        Ok(saved)
    }

    /// Soft delete
    pub async fn deactivate(
        &self,
        identifier: &str,
        role: &ViewerRole,
        modified_by: Option<&str>,
    ) -> AppResult<Content> {
        self.save(
            identifier,
            serde_json::json!({"visibility": {"isActive": false}}),
            role,
            modified_by,
        )
        .await
    }

    /// Count a view of content the caller can see. Views and lastViewed
    /// change in one atomic store update.
    pub async fn increment_view(
        &self,
        identifier: &str,
        role: &ViewerRole,
    ) -> AppResult<Option<Content>> {
        let content = match self.get_by_identifier(identifier, role).await? {
            Some(content) => content,
            None => return Ok(None),
        };
        let id = content.id().cloned().ok_or_else(|| {
            AppError::Internal(format!("Content '{}' has no id", identifier))
        })?;

        let now = now_timestamp();
        let update = CounterUpdate::new()
            .increment("analytics.views", 1)
            .set("analytics.lastViewed", now.as_str())
            .set("updatedAt", now.as_str());

        self.contents
            .gen_apply_counters(&id, &update)
            .await
            .map_err(|e| match e {
                AppError::DatabaseError(detail) => {
                    AppError::QueryFailed(format!("Failed to record view: {}", detail))
                }
                other => other,
            })
    }
}
