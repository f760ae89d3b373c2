// Content Schema - CMS-managed UI fragments (pages, banners, modals, ...)

use crate::ent_framework::ent_schema::{
    EntSchema, FieldDefault, FieldDefinition, FieldType, FieldValidator, IndexDefinition,
    TextIndexDefinition,
};

pub const CONTENT_TYPES: &[&str] = &[
    "page",
    "section",
    "banner",
    "footer",
    "navigation",
    "modal",
    "notification",
];
pub const IDENTIFIER_PATTERN: &str = "^[a-z0-9][a-z0-9_-]*$";
/// Path segments that `/content/{identifier}/...` routes cannot reach
pub const RESERVED_IDENTIFIERS: &[&str] = &["type"];

/// Content entity schema
pub struct ContentSchema;

impl EntSchema for ContentSchema {
    fn collection() -> &'static str {
        "contents"
    }

    fn fields() -> Vec<FieldDefinition> {
        let mut fields = vec![
            // Identity
            FieldDefinition::new("type", FieldType::enumeration(CONTENT_TYPES)),
            FieldDefinition::new("identifier", FieldType::String)
                .unique()
                .validate(FieldValidator::MinLength(1))
                .validate(FieldValidator::MaxLength(100))
                .validate(FieldValidator::Pattern(IDENTIFIER_PATTERN.to_string()))
                .validate(FieldValidator::Reserved(
                    RESERVED_IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
                )),
            // Payload
            FieldDefinition::new("title", FieldType::String)
                .validate(FieldValidator::MaxLength(200)),
            FieldDefinition::new("content", FieldType::JSON),
            // Metadata
            FieldDefinition::new("metadata.description", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(500)),
            FieldDefinition::new("metadata.keywords", FieldType::StringList)
                .default_value(FieldDefault::EmptyList),
            FieldDefinition::new("metadata.author", FieldType::String).optional(),
            FieldDefinition::new("metadata.version", FieldType::Int)
                .default_value(FieldDefault::Int(1))
                .validate(FieldValidator::Range(1.0, f64::MAX)),
            FieldDefinition::new("metadata.lastModifiedBy", FieldType::String).optional(),
            // Styling
            FieldDefinition::new("styling.cssClass", FieldType::String).optional(),
            FieldDefinition::new("styling.inlineStyles", FieldType::JSON).optional(),
            FieldDefinition::new("styling.theme", FieldType::enumeration(&["light", "dark", "auto"]))
                .default_value(FieldDefault::string("light")),
            // Visibility
            FieldDefinition::new("visibility.isPublic", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
            FieldDefinition::new(
                "visibility.userTypes",
                FieldType::enum_list(&["all", "admin", "institution", "regular", "public"]),
            )
            .default_value(FieldDefault::EmptyList),
            FieldDefinition::new("visibility.startDate", FieldType::Time).optional(),
            FieldDefinition::new("visibility.endDate", FieldType::Time).optional(),
            FieldDefinition::new("visibility.isActive", FieldType::Bool)
                .default_value(FieldDefault::Bool(true)),
            // Localization
            FieldDefinition::new("language", FieldType::String)
                .default_value(FieldDefault::string("en")),
            FieldDefinition::new("translations", FieldType::ObjectList)
                .default_value(FieldDefault::EmptyList),
            // SEO
            FieldDefinition::new("seo.metaTitle", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(60)),
            FieldDefinition::new("seo.metaDescription", FieldType::String)
                .optional()
                .validate(FieldValidator::MaxLength(160)),
            FieldDefinition::new("seo.canonicalUrl", FieldType::String).optional(),
            FieldDefinition::new("seo.ogImage", FieldType::String).optional(),
            // Analytics
            FieldDefinition::new("analytics.views", FieldType::Int)
                .default_value(FieldDefault::Int(0)),
            FieldDefinition::new("analytics.lastViewed", FieldType::Time).optional(),
            FieldDefinition::new("analytics.engagement.clicks", FieldType::Int)
                .default_value(FieldDefault::Int(0)),
            FieldDefinition::new("analytics.engagement.timeSpent", FieldType::Float)
                .default_value(FieldDefault::Int(0)),
            // Permissions
            FieldDefinition::new(
                "permissions.canEdit",
                FieldType::enum_list(&["admin", "institution", "regular"]),
            )
            .default_value(FieldDefault::StringList(vec!["admin".to_string()])),
            FieldDefinition::new(
                "permissions.canView",
                FieldType::enum_list(&["admin", "institution", "regular", "public"]),
            )
            .default_value(FieldDefault::EmptyList),
        ];
        fields.extend(super::timestamp_fields());
        fields
    }

    fn indexes() -> Vec<IndexDefinition> {
        vec![
            IndexDefinition::new("identifier", vec!["identifier"]).unique(),
            IndexDefinition::new("type_active", vec!["type", "visibility.isActive"]),
            IndexDefinition::new("language", vec!["language"]),
        ]
    }

    fn text_index() -> Option<TextIndexDefinition> {
        Some(TextIndexDefinition::new(&[
            ("title", 10),
            ("metadata.description", 5),
            ("metadata.keywords", 3),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ent_framework::ent_schema::SchemaDefinition;
    use serde_json::json;

    fn schema() -> SchemaDefinition {
        SchemaDefinition::of::<ContentSchema>()
    }

    #[test]
    fn test_defaults_fill_nested_sections() {
        let mut doc = json!({"type": "banner", "identifier": "promo", "title": "t", "content": null});
        schema().apply_defaults(&mut doc);
        assert_eq!(doc["metadata"]["version"], json!(1));
        assert_eq!(doc["styling"]["theme"], json!("light"));
        assert_eq!(doc["visibility"]["isActive"], json!(true));
        assert_eq!(doc["permissions"]["canEdit"], json!(["admin"]));
        assert_eq!(doc["analytics"]["views"], json!(0));
        assert_eq!(doc["language"], json!("en"));
    }

    #[test]
    fn test_identifier_rules() {
        let schema = schema();
        for bad in ["Promo", "-promo", "", "with space", "type"] {
            let mut doc = json!({"type": "page", "identifier": bad, "title": "t", "content": {}});
            schema.apply_defaults(&mut doc);
            let errors = schema.validate(&doc);
            assert!(
                errors.iter().any(|e| e.field == "identifier"),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_missing_type_and_unknown_theme() {
        let schema = schema();
        let mut doc = json!({"identifier": "x", "title": "t", "content": "c", "styling": {"theme": "neon"}});
        schema.apply_defaults(&mut doc);
        let fields: Vec<String> = schema.validate(&doc).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["type".to_string(), "styling.theme".to_string()]);
    }
}
