// Search activity records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::DocumentId;
use crate::ent_framework::Entity;
use crate::schemas::{TopicSearchSchema, UserSearchHistorySchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    #[default]
    Web,
    Mobile,
    Api,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSearch {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub topic: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub source: SearchSource,
    #[serde(default)]
    pub filters: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for TopicSearch {
    type Schema = TopicSearchSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}

/// How often a topic has been searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Career,
    Program,
    Topic,
    Video,
    #[default]
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchHistory {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub clicked_results: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for UserSearchHistory {
    type Schema = UserSearchHistorySchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}
