// Feedback and support records - written by users, read back by staff

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::DocumentId;
use crate::ent_framework::Entity;
use crate::schemas::{ChatAgentFeedbackSchema, SummaryFeedbackSchema, SupportQuerySchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackType {
    #[default]
    Helpful,
    NotHelpful,
    Inaccurate,
    Inappropriate,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAgentFeedback {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub user_id: String,
    pub session_id: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub agent_response: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ChatAgentFeedback {
    type Schema = ChatAgentFeedbackSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFeedback {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub user_id: String,
    pub summary_id: String,
    pub rating: u8,
    #[serde(default = "default_helpful")]
    pub helpful: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_helpful() -> bool {
    true
}

impl Entity for SummaryFeedback {
    type Schema = SummaryFeedbackSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportCategory {
    #[default]
    General,
    Technical,
    Account,
    Career,
    Program,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl SupportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::Open => "open",
            SupportStatus::InProgress => "in-progress",
            SupportStatus::Resolved => "resolved",
            SupportStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportQuery {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub category: SupportCategory,
    #[serde(default)]
    pub priority: SupportPriority,
    #[serde(default)]
    pub status: SupportStatus,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for SupportQuery {
    type Schema = SupportQuerySchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}
