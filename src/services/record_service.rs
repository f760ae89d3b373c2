// RecordService - write-mostly collections: feedback, support, search activity, video pools

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    core::document_path::set_path,
    ent_framework::{EntRepository, Entity, HookRegistry},
    entities::{
        ChatAgentFeedback, SummaryFeedback, SupportQuery, SupportStatus, TopicCount, TopicSearch,
        TopicVideoPool, UserSearchHistory,
    },
    error::AppResult,
    infrastructure::database::{DocQuery, DocumentStore, FieldFilter, SortKey},
};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_TOP_TOPICS: usize = 10;

fn newest_first(limit: Option<usize>) -> DocQuery {
    DocQuery::new()
        .sort(SortKey::desc("createdAt"))
        .limit(limit.unwrap_or(DEFAULT_PAGE_SIZE))
}

#[derive(Clone)]
pub struct RecordService {
    chat_feedback: EntRepository<ChatAgentFeedback>,
    summary_feedback: EntRepository<SummaryFeedback>,
    support_queries: EntRepository<SupportQuery>,
    topic_searches: EntRepository<TopicSearch>,
    search_history: EntRepository<UserSearchHistory>,
    video_pools: EntRepository<TopicVideoPool>,
}

impl RecordService {
    pub fn new(store: Arc<dyn DocumentStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            chat_feedback: EntRepository::new(store.clone(), hooks.clone()),
            summary_feedback: EntRepository::new(store.clone(), hooks.clone()),
            support_queries: EntRepository::new(store.clone(), hooks.clone()),
            topic_searches: EntRepository::new(store.clone(), hooks.clone()),
            search_history: EntRepository::new(store.clone(), hooks.clone()),
            video_pools: EntRepository::new(store, hooks),
        }
    }

    // Feedback

    pub async fn submit_chat_feedback(&self, data: Value) -> AppResult<ChatAgentFeedback> {
        self.chat_feedback.gen_create(data).await
    }

    pub async fn chat_feedback_for_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<ChatAgentFeedback>> {
        let query = newest_first(limit).filter(FieldFilter::eq("userId", user_id));
        self.chat_feedback.gen_query(&query).await
    }

    pub async fn submit_summary_feedback(&self, data: Value) -> AppResult<SummaryFeedback> {
        self.summary_feedback.gen_create(data).await
    }

    pub async fn recent_summary_feedback(
        &self,
        limit: Option<usize>,
    ) -> AppResult<Vec<SummaryFeedback>> {
        self.summary_feedback.gen_query(&newest_first(limit)).await
    }

    // Support

    pub async fn create_support_query(&self, data: Value) -> AppResult<SupportQuery> {
        let query = self.support_queries.gen_create(data).await?;
        tracing::info!(category = ?query.category, priority = ?query.priority, "support query received");
        Ok(query)
    }

    /// Newest first; all statuses when `status` is None
    pub async fn support_queries(
        &self,
        status: Option<SupportStatus>,
        limit: Option<usize>,
    ) -> AppResult<Vec<SupportQuery>> {
        let mut query = newest_first(limit);
        if let Some(status) = status {
            query = query.filter(FieldFilter::eq("status", status.as_str()));
        }
        self.support_queries.gen_query(&query).await
    }

    // Search activity

    pub async fn record_topic_search(&self, data: Value) -> AppResult<TopicSearch> {
        self.topic_searches.gen_create(data).await
    }

    /// Most searched topics, case-insensitive, highest count first
    pub async fn top_topics(&self, limit: Option<usize>) -> AppResult<Vec<TopicCount>> {
        let searches = self.topic_searches.gen_query(&DocQuery::new()).await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for search in searches {
            let topic = search.topic.trim().to_lowercase();
            if !topic.is_empty() {
                *counts.entry(topic).or_default() += 1;
            }
        }

        let mut ranked: Vec<TopicCount> = counts
            .into_iter()
            .map(|(topic, count)| TopicCount { topic, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
        ranked.truncate(limit.unwrap_or(DEFAULT_TOP_TOPICS));
        Ok(ranked)
    }

    pub async fn record_search(&self, data: Value) -> AppResult<UserSearchHistory> {
        self.search_history.gen_create(data).await
    }

    pub async fn search_history_for_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<UserSearchHistory>> {
        let query = newest_first(limit).filter(FieldFilter::eq("userId", user_id));
        self.search_history.gen_query(&query).await
    }

    // Video pools

    /// Replace the pool for `topic`, creating it on first use
    pub async fn upsert_video_pool(&self, topic: &str, mut data: Value) -> AppResult<TopicVideoPool> {
        set_path(&mut data, "topic", Value::from(topic));
        let pool = self.video_pools.gen_upsert_by_unique(topic, data).await?;
        tracing::debug!(
            collection = TopicVideoPool::collection(),
            topic,
            videos = pool.videos.len(),
            "video pool stored"
        );
        Ok(pool)
    }

    pub async fn video_pool_for_topic(&self, topic: &str) -> AppResult<Option<TopicVideoPool>> {
        self.video_pools.gen_by_unique(topic).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ent_framework::create_default_hook_registry;
    use crate::error::AppError;
    use crate::infrastructure::sqlite_database::SqliteDocumentStore;
    use serde_json::json;

    async fn service() -> RecordService {
        let store = Arc::new(SqliteDocumentStore::new_in_memory().await.unwrap());
        RecordService::new(store, Arc::new(create_default_hook_registry()))
    }

    #[tokio::test]
    async fn test_support_query_defaults_and_status_filter() {
        let svc = service().await;
        let created = svc
            .create_support_query(json!({
                "name": "Aisha", "email": "aisha@example.com",
                "subject": "Login", "message": "Cannot sign in"
            }))
            .await
            .unwrap();
        assert_eq!(created.status, SupportStatus::Open);

        assert_eq!(svc.support_queries(Some(SupportStatus::Open), None).await.unwrap().len(), 1);
        assert!(svc.support_queries(Some(SupportStatus::Closed), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_and_rating_are_rejected() {
        let svc = service().await;
        let err = svc
            .create_support_query(json!({"name": "A", "email": "nope", "subject": "s", "message": "m"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FieldValidation(_)));

        let err = svc
            .submit_chat_feedback(json!({"userId": "u", "sessionId": "s", "rating": 6}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FieldValidation(_)));
    }

    #[tokio::test]
    async fn test_top_topics_counts_case_insensitively() {
        let svc = service().await;
        for topic in ["AI", "ai", "Nursing", "ai", "Nursing", "Law"] {
            svc.record_topic_search(json!({"topic": topic})).await.unwrap();
        }
        let top = svc.top_topics(Some(2)).await.unwrap();
        assert_eq!(
            top,
            vec![
                TopicCount { topic: "ai".to_string(), count: 3 },
                TopicCount { topic: "nursing".to_string(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_video_pool_upsert_keeps_one_document_per_topic() {
        let svc = service().await;
        svc.upsert_video_pool("python", json!({"videos": [{"videoId": "a", "title": "A"}]}))
            .await
            .unwrap();
        let pool = svc
            .upsert_video_pool("python", json!({"videos": [{"videoId": "b", "title": "B"}, {"videoId": "c", "title": "C"}]}))
            .await
            .unwrap();
        assert_eq!(pool.videos.len(), 2);
        assert!(pool.last_refreshed.is_some());

        let loaded = svc.video_pool_for_topic("python").await.unwrap().unwrap();
        assert_eq!(loaded.id, pool.id);
        assert!(svc.video_pool_for_topic("rust").await.unwrap().is_none());
    }
}
