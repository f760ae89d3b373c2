// Schema definitions for the passive record collections

use crate::ent_framework::ent_schema::{
    EntSchema, FieldDefault, FieldDefinition, FieldType, FieldValidator, IndexDefinition,
};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn with_timestamps(mut fields: Vec<FieldDefinition>) -> Vec<FieldDefinition> {
    fields.extend(super::timestamp_fields());
    fields
}

fn rating() -> FieldDefinition {
    FieldDefinition::new("rating", FieldType::Int).validate(FieldValidator::Range(1.0, 5.0))
}

/// Ratings left on chat agent answers
pub struct ChatAgentFeedbackSchema;

impl EntSchema for ChatAgentFeedbackSchema {
    fn collection() -> &'static str {
        "chat_agent_feedbacks"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("userId", FieldType::String),
            FieldDefinition::new("sessionId", FieldType::String),
            FieldDefinition::new("messageId", FieldType::String).optional(),
            FieldDefinition::new("userQuery", FieldType::String).optional(),
            FieldDefinition::new("agentResponse", FieldType::String).optional(),
            rating(),
            FieldDefinition::new(
                "feedbackType",
                FieldType::enumeration(&[
                    "helpful",
                    "not-helpful",
                    "inaccurate",
                    "inappropriate",
                    "other",
                ]),
            )
            .default_value(FieldDefault::string("helpful")),
            FieldDefinition::new("comment", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(1000)),
        ])
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("user", vec!["userId"])]
    }
}

/// Contact-form submissions
pub struct SupportQuerySchema;

impl EntSchema for SupportQuerySchema {
    fn collection() -> &'static str {
        "support_queries"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("userId", FieldType::String).optional(),
            FieldDefinition::new("name", FieldType::String)
                .validate(FieldValidator::MaxLength(100)),
            FieldDefinition::new("email", FieldType::String)
                .validate(FieldValidator::Pattern(EMAIL_PATTERN.to_string())),
            FieldDefinition::new("subject", FieldType::String)
                .validate(FieldValidator::MaxLength(200)),
            FieldDefinition::new("message", FieldType::String)
                .validate(FieldValidator::MaxLength(5000)),
            FieldDefinition::new(
                "category",
                FieldType::enumeration(&["general", "technical", "account", "career", "program", "other"]),
            )
            .default_value(FieldDefault::string("general")),
            FieldDefinition::new("priority", FieldType::enumeration(&["low", "medium", "high", "urgent"]))
                .default_value(FieldDefault::string("medium")),
            FieldDefinition::new(
                "status",
                FieldType::enumeration(&["open", "in-progress", "resolved", "closed"]),
            )
            .default_value(FieldDefault::string("open")),
            FieldDefinition::new("response", FieldType::String).optional(),
        ])
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("status", vec!["status"])]
    }
}

pub struct TopicSearchSchema;

impl EntSchema for TopicSearchSchema {
    fn collection() -> &'static str {
        "topic_searches"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("topic", FieldType::String)
                .validate(FieldValidator::MaxLength(200)),
            FieldDefinition::new("userId", FieldType::String).optional(),
            FieldDefinition::new("resultsCount", FieldType::Int)
                .default_value(FieldDefault::Int(0))
                .validate(FieldValidator::Range(0.0, f64::MAX)),
            FieldDefinition::new("source", FieldType::enumeration(&["web", "mobile", "api"]))
                .default_value(FieldDefault::string("web")),
            FieldDefinition::new("filters", FieldType::JSON).optional(),
        ])
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("topic", vec!["topic"])]
    }
}

pub struct UserSearchHistorySchema;

impl EntSchema for UserSearchHistorySchema {
    fn collection() -> &'static str {
        "user_search_histories"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("userId", FieldType::String),
            FieldDefinition::new("query", FieldType::String)
                .validate(FieldValidator::MaxLength(500)),
            FieldDefinition::new(
                "searchType",
                FieldType::enumeration(&["career", "program", "topic", "video", "general"]),
            )
            .default_value(FieldDefault::string("general")),
            FieldDefinition::new("resultsCount", FieldType::Int)
                .default_value(FieldDefault::Int(0)),
            FieldDefinition::new("clickedResults", FieldType::StringList)
                .default_value(FieldDefault::EmptyList),
        ])
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("user_created", vec!["userId", "createdAt"])]
    }
}

pub struct SummaryFeedbackSchema;

impl EntSchema for SummaryFeedbackSchema {
    fn collection() -> &'static str {
        "summary_feedbacks"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("userId", FieldType::String),
            FieldDefinition::new("summaryId", FieldType::String),
            rating(),
            FieldDefinition::new("helpful", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
            FieldDefinition::new("comment", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(1000)),
        ])
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![IndexDefinition::new("user", vec!["userId"])]
    }
}

/// Cached video lists per topic
pub struct TopicVideoPoolSchema;

impl EntSchema for TopicVideoPoolSchema {
    fn collection() -> &'static str {
        "topic_video_pools"
    }

    fn fields() -> Vec<FieldDefinition> {
        with_timestamps(vec![
            FieldDefinition::new("topic", FieldType::String)
                .unique()
                .validate(FieldValidator::MinLength(1)),
            FieldDefinition::new("videos", FieldType::ObjectList)
                .default_value(FieldDefault::EmptyList),
            FieldDefinition::new("lastRefreshed", FieldType::Time)
                .default_value(FieldDefault::Function("now".to_string())),
            FieldDefinition::new("isActive", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
        ])
    }
}
