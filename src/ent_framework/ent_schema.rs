// Ent Schema Framework - declarative document schemas
// Field definitions carry type, requiredness, defaults and validators; a
// SchemaDefinition applies defaults and validates a JSON document against them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::document_path::{get_path, is_missing, set_path};
use crate::error::FieldError;

/// Schema definition trait - one implementation per collection
pub trait EntSchema: Send + Sync {
    /// Collection the documents are stored in
    fn collection() -> &'static str;

    /// Define fields for this entity
    fn fields() -> Vec<FieldDefinition>;

    /// Define secondary indexes for this entity
    fn indexes() -> Vec<IndexDefinition> {
        Vec::new()
    }

    /// Weighted fields searched by free-text queries
    fn text_index() -> Option<TextIndexDefinition> {
        None
    }
}

/// Field definition - `name` is a dot path into the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub optional: bool,
    pub default: Option<FieldDefault>,
    pub unique: bool,
    pub validators: Vec<FieldValidator>,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            optional: false,
            default: None,
            unique: false,
            validators: Vec::new(),
        }
    }

    /// Mark field as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark field as unique across the collection
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add default value
    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Add field validator
    pub fn validate(mut self, validator: FieldValidator) -> Self {
        self.validators.push(validator);
        self
    }

    fn check(&self, value: Option<&Value>, errors: &mut Vec<FieldError>) {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => {
                if !self.optional {
                    errors.push(FieldError::new(&self.name, "is required"));
                }
                return;
            }
        };

        if let Some(message) = self.field_type.check(value) {
            errors.push(FieldError::new(&self.name, message));
            return;
        }

        for validator in &self.validators {
            if let Some(message) = validator.check(value) {
                errors.push(FieldError::new(&self.name, message));
            }
        }
    }
}

/// Field types supported by the schema layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    Time,
    /// Opaque value, never inspected
    JSON,
    Enum(Vec<String>),
    StringList,
    EnumList(Vec<String>),
    ObjectList,
}

impl FieldType {
    pub fn enumeration(values: &[&str]) -> Self {
        FieldType::Enum(values.iter().map(|v| v.to_string()).collect())
    }

    pub fn enum_list(values: &[&str]) -> Self {
        FieldType::EnumList(values.iter().map(|v| v.to_string()).collect())
    }

    fn check(&self, value: &Value) -> Option<String> {
        match self {
            FieldType::String => (!value.is_string()).then(|| "must be a string".to_string()),
            FieldType::Int => {
                (!(value.is_i64() || value.is_u64())).then(|| "must be an integer".to_string())
            }
            FieldType::Float => (!value.is_number()).then(|| "must be a number".to_string()),
            FieldType::Bool => (!value.is_boolean()).then(|| "must be a boolean".to_string()),
            FieldType::Time => match value.as_str() {
                Some(raw) if DateTime::parse_from_rfc3339(raw).is_ok() => None,
                _ => Some("must be an RFC 3339 timestamp".to_string()),
            },
            FieldType::JSON => None,
            FieldType::Enum(allowed) => match value.as_str() {
                Some(v) if allowed.iter().any(|a| a == v) => None,
                _ => Some(format!("must be one of: {}", allowed.join(", "))),
            },
            FieldType::StringList => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => None,
                _ => Some("must be a list of strings".to_string()),
            },
            FieldType::EnumList(allowed) => match value.as_array() {
                Some(items)
                    if items
                        .iter()
                        .all(|i| i.as_str().is_some_and(|v| allowed.iter().any(|a| a == v))) =>
                {
                    None
                }
                _ => Some(format!("must be a list of: {}", allowed.join(", "))),
            },
            FieldType::ObjectList => match value.as_array() {
                Some(items) if items.iter().all(Value::is_object) => None,
                _ => Some("must be a list of objects".to_string()),
            },
        }
    }
}

/// Field default values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldDefault {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    StringList(Vec<String>),
    EmptyList,
    Function(String), // Function name for dynamic defaults
}

impl FieldDefault {
    pub fn string(value: &str) -> Self {
        FieldDefault::String(value.to_string())
    }

    fn resolve(&self) -> Value {
        match self {
            FieldDefault::String(s) => Value::String(s.clone()),
            FieldDefault::Int(i) => Value::from(*i),
            FieldDefault::Float(f) => Value::from(*f),
            FieldDefault::Bool(b) => Value::Bool(*b),
            FieldDefault::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldDefault::EmptyList => Value::Array(Vec::new()),
            FieldDefault::Function(name) => match name.as_str() {
                "now" => Value::String(now_timestamp()),
                _ => Value::Null,
            },
        }
    }
}

/// Field validators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValidator {
    MinLength(usize),
    MaxLength(usize),
    Pattern(String), // Regex pattern
    Range(f64, f64), // Min, Max for numeric types
    Reserved(Vec<String>),
}

impl FieldValidator {
    fn check(&self, value: &Value) -> Option<String> {
        match self {
            FieldValidator::MinLength(min) => value
                .as_str()
                .filter(|s| s.chars().count() < *min)
                .map(|_| format!("must be at least {} characters", min)),
            FieldValidator::MaxLength(max) => value
                .as_str()
                .filter(|s| s.chars().count() > *max)
                .map(|_| format!("must be at most {} characters", max)),
            FieldValidator::Pattern(pattern) => {
                let text = value.as_str()?;
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(text) => None,
                    Ok(_) => Some("has an invalid format".to_string()),
                    Err(e) => {
                        tracing::error!("Invalid schema pattern {}: {}", pattern, e);
                        Some("could not be checked".to_string())
                    }
                }
            }
            FieldValidator::Range(min, max) => value
                .as_f64()
                .filter(|n| n < min || n > max)
                .map(|_| format!("must be between {} and {}", min, max)),
            FieldValidator::Reserved(words) => value
                .as_str()
                .filter(|s| words.iter().any(|w| w == s))
                .map(|s| format!("'{}' is reserved", s)),
        }
    }
}

/// Index definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: &str, fields: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.into_iter().map(|s| s.to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Weighted free-text index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextIndexDefinition {
    pub fields: Vec<(String, u32)>,
}

impl TextIndexDefinition {
    pub fn new(fields: &[(&str, u32)]) -> Self {
        Self {
            fields: fields.iter().map(|(f, w)| (f.to_string(), *w)).collect(),
        }
    }
}

/// Materialized schema for one collection
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub collection: &'static str,
    pub fields: Vec<FieldDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub text_index: Option<TextIndexDefinition>,
}

impl SchemaDefinition {
    pub fn of<S: EntSchema>() -> Self {
        Self {
            collection: S::collection(),
            fields: S::fields(),
            indexes: S::indexes(),
            text_index: S::text_index(),
        }
    }

    /// First field marked unique; its value becomes the document's unique key
    pub fn unique_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.unique)
            .map(|f| f.name.as_str())
    }

    /// Fill absent or null fields that declare a default
    pub fn apply_defaults(&self, doc: &mut Value) {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if is_missing(doc, &field.name) {
                    set_path(doc, &field.name, default.resolve());
                }
            }
        }
    }

    /// Check every field, collecting all failures rather than stopping at the first
    pub fn validate(&self, doc: &Value) -> Vec<FieldError> {
        if !doc.is_object() {
            return vec![FieldError::new("$", "document must be a JSON object")];
        }
        let mut errors = Vec::new();
        for field in &self.fields {
            field.check(get_path(doc, &field.name), &mut errors);
        }
        errors
    }
}

/// Schema registry - holds all defined schemas keyed by collection
#[derive(Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Arc<SchemaDefinition>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema
    pub fn register<T: EntSchema + 'static>(&mut self) {
        let schema = SchemaDefinition::of::<T>();
        self.schemas.insert(schema.collection, Arc::new(schema));
    }

    pub fn get(&self, collection: &str) -> Option<Arc<SchemaDefinition>> {
        self.schemas.get(collection).cloned()
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<SchemaDefinition>> {
        self.schemas.values()
    }

    pub fn collections(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Validate schema consistency
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for schema in self.schemas.values() {
            let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();

            if schema.fields.iter().filter(|f| f.unique).count() > 1 {
                errors.push(format!(
                    "Collection '{}' declares more than one unique field",
                    schema.collection
                ));
            }

            for index in &schema.indexes {
                for field in &index.fields {
                    if !names.contains(&field.as_str()) {
                        errors.push(format!(
                            "Index '{}' on '{}' references undefined field '{}'",
                            index.name, schema.collection, field
                        ));
                    }
                }
            }

            if let Some(text) = &schema.text_index {
                for (field, _) in &text.fields {
                    if !names.contains(&field.as_str()) {
                        errors.push(format!(
                            "Text index on '{}' references undefined field '{}'",
                            schema.collection, field
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Timestamp format used for every stored time value
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct WidgetSchema;

    impl EntSchema for WidgetSchema {
        fn collection() -> &'static str {
            "widgets"
        }

        fn fields() -> Vec<FieldDefinition> {
            vec![
                FieldDefinition::new("name", FieldType::String)
                    .unique()
                    .validate(FieldValidator::MaxLength(5)),
                FieldDefinition::new("kind", FieldType::enumeration(&["a", "b"]))
                    .default_value(FieldDefault::string("a")),
                FieldDefinition::new("stats.score", FieldType::Float)
                    .validate(FieldValidator::Range(0.0, 100.0))
                    .default_value(FieldDefault::Float(0.0)),
                FieldDefinition::new("tags", FieldType::StringList)
                    .default_value(FieldDefault::EmptyList),
                FieldDefinition::new("code", FieldType::String)
                    .optional()
                    .validate(FieldValidator::Pattern("^[A-Z]+$".to_string())),
            ]
        }

        fn indexes() -> Vec<IndexDefinition> {
            vec![IndexDefinition::new("idx_kind", vec!["kind"])]
        }
    }

    #[test]
    fn test_defaults_fill_nested_paths() {
        let schema = SchemaDefinition::of::<WidgetSchema>();
        let mut doc = json!({"name": "w", "kind": null});
        schema.apply_defaults(&mut doc);
        assert_eq!(doc["kind"], json!("a"));
        assert_eq!(doc["stats"]["score"], json!(0.0));
        assert_eq!(doc["tags"], json!([]));
        assert!(schema.validate(&doc).is_empty());
    }

    #[test]
    fn test_validation_reports_every_field() {
        let schema = SchemaDefinition::of::<WidgetSchema>();
        let doc = json!({
            "kind": "c",
            "stats": {"score": 101},
            "tags": ["ok", 3],
            "code": "lower"
        });
        let fields: Vec<String> = schema.validate(&doc).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "kind", "stats.score", "tags", "code"]);
    }

    #[test]
    fn test_max_length_counts_chars() {
        let schema = SchemaDefinition::of::<WidgetSchema>();
        let errors = schema.validate(&json!({"name": "toolong", "kind": "a", "stats": {"score": 1}, "tags": []}));
        assert_eq!(errors, vec![FieldError::new("name", "must be at most 5 characters")]);
    }

    #[test]
    fn test_registry_validates_index_fields() {
        let mut registry = SchemaRegistry::new();
        registry.register::<WidgetSchema>();
        assert!(registry.validate().is_ok());
        assert_eq!(registry.get("widgets").unwrap().unique_field(), Some("name"));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let schema = SchemaDefinition::of::<WidgetSchema>();
        assert_eq!(schema.validate(&json!([1, 2])).len(), 1);
    }
}
