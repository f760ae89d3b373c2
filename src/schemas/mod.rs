// Schema definitions module - centralized schema registry

pub mod career_forecast_schema;
pub mod content_schema;
pub mod simple_schemas;

pub use crate::ent_framework::ent_schema::{EntSchema, SchemaRegistry};

pub use career_forecast_schema::CareerForecastSchema;
pub use content_schema::ContentSchema;
pub use simple_schemas::{
    ChatAgentFeedbackSchema, SummaryFeedbackSchema, SupportQuerySchema, TopicSearchSchema,
    TopicVideoPoolSchema, UserSearchHistorySchema,
};

use crate::ent_framework::ent_schema::{FieldDefinition, FieldType};

/// Audit timestamps carried by every collection; filled in by the timestamp hook
pub(crate) fn timestamp_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("createdAt", FieldType::Time).optional(),
        FieldDefinition::new("updatedAt", FieldType::Time).optional(),
    ]
}

/// Initialize and register all schemas
pub fn create_schema_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register::<ContentSchema>();
    registry.register::<CareerForecastSchema>();
    registry.register::<ChatAgentFeedbackSchema>();
    registry.register::<SupportQuerySchema>();
    registry.register::<TopicSearchSchema>();
    registry.register::<UserSearchHistorySchema>();
    registry.register::<SummaryFeedbackSchema>();
    registry.register::<TopicVideoPoolSchema>();

    registry
}

/// Validate all registered schemas
pub fn validate_schemas() -> Result<(), Vec<String>> {
    create_schema_registry().validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_are_consistent() {
        assert_eq!(validate_schemas(), Ok(()));
        assert_eq!(
            create_schema_registry().collections(),
            vec![
                "career_forecasts",
                "chat_agent_feedbacks",
                "contents",
                "summary_feedbacks",
                "support_queries",
                "topic_searches",
                "topic_video_pools",
                "user_search_histories",
            ]
        );
    }
}
