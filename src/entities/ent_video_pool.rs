// EntTopicVideoPool - cached video list for a topic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::DocumentId;
use crate::ent_framework::Entity;
use crate::schemas::TopicVideoPoolSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicVideoPool {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub topic: String,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub last_refreshed: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Entity for TopicVideoPool {
    type Schema = TopicVideoPoolSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}
