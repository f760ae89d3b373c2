// EntContent - CMS content record with visibility, localization and edit rights

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{DocumentId, Role, ViewerRole};
use crate::ent_framework::{Entity, PrivacyContext};
use crate::entities::content_privacy::CONTENT_VISIBILITY;
use crate::error::AppError;
use crate::schemas::ContentSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Page,
    Section,
    Banner,
    Footer,
    Navigation,
    Modal,
    Notification,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Page => "page",
            ContentType::Section => "section",
            ContentType::Banner => "banner",
            ContentType::Footer => "footer",
            ContentType::Navigation => "navigation",
            ContentType::Modal => "modal",
            ContentType::Notification => "notification",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(ContentType::Page),
            "section" => Ok(ContentType::Section),
            "banner" => Ok(ContentType::Banner),
            "footer" => Ok(ContentType::Footer),
            "navigation" => Ok(ContentType::Navigation),
            "modal" => Ok(ContentType::Modal),
            "notification" => Ok(ContentType::Notification),
            other => Err(AppError::BadRequest(format!("Unknown content type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentMetadata {
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub version: i64,
    pub last_modified_by: Option<String>,
}

impl Default for ContentMetadata {
    fn default() -> Self {
        Self {
            description: None,
            keywords: Vec::new(),
            author: None,
            version: 1,
            last_modified_by: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styling {
    pub css_class: Option<String>,
    pub inline_styles: Option<Value>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Visibility {
    pub is_public: bool,
    pub user_types: Vec<Role>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            is_public: true,
            user_types: Vec::new(),
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical_url: Option<String>,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Engagement {
    pub clicks: i64,
    pub time_spent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub views: i64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub engagement: Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permissions {
    pub can_edit: Vec<Role>,
    pub can_view: Vec<Role>,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            can_edit: vec![Role::Admin],
            can_view: Vec::new(),
        }
    }
}

/// A content record as stored in the `contents` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub identifier: String,
    pub title: String,
    /// Opaque payload, never interpreted by the backend
    pub content: Value,
    #[serde(default)]
    pub metadata: ContentMetadata,
    #[serde(default)]
    pub styling: Styling,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub seo: Seo,
    #[serde(default)]
    pub analytics: Analytics,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Title and body resolved for one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedContent {
    pub identifier: String,
    pub language: String,
    pub title: String,
    pub content: Value,
}

impl Entity for Content {
    type Schema = ContentSchema;

    fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }
}

impl Content {
    /// Visibility decision for `role` at a given instant
    pub fn is_visible_at(&self, role: &ViewerRole, now: DateTime<Utc>) -> bool {
        CONTENT_VISIBILITY.allows(self, &PrivacyContext::new(role, now))
    }

    pub fn is_visible_to_user(&self, role: &ViewerRole) -> bool {
        self.is_visible_at(role, Utc::now())
    }

    /// Plain membership in `permissions.canEdit`; roles carry no hierarchy
    pub fn can_user_edit(&self, role: &ViewerRole) -> bool {
        role.is_in(&self.permissions.can_edit)
    }

    /// Resolve title and body for `language`, falling back to the base
    /// fields for anything the translation leaves out.
    pub fn get_localized_content(&self, language: &str) -> LocalizedContent {
        let base = || LocalizedContent {
            identifier: self.identifier.clone(),
            language: self.language.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        };

        if language == "en" || self.translations.is_empty() {
            return base();
        }

        match self.translations.iter().find(|t| t.language == language) {
            Some(translation) => LocalizedContent {
                identifier: self.identifier.clone(),
                language: translation.language.clone(),
                title: translation
                    .title
                    .clone()
                    .unwrap_or_else(|| self.title.clone()),
                content: translation
                    .content
                    .clone()
                    .unwrap_or_else(|| self.content.clone()),
            },
            None => base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content() -> Content {
        serde_json::from_value(json!({
            "_id": "c-1",
            "type": "banner",
            "identifier": "welcome",
            "title": "Welcome",
            "content": {"body": "Hello"},
            "translations": [
                {"language": "ms", "title": "Selamat datang"},
                {"language": "zh", "content": {"body": "你好"}},
                {"language": "ms", "title": "Second match"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_sparse_document_gets_struct_defaults() {
        let c = content();
        assert_eq!(c.metadata.version, 1);
        assert!(c.visibility.is_active);
        assert!(c.visibility.is_public);
        assert_eq!(c.permissions.can_edit, vec![Role::Admin]);
        assert_eq!(c.language, "en");
        assert_eq!(c.styling.theme, Theme::Light);
    }

    #[test]
    fn test_localization_falls_back_per_field() {
        let c = content();

        let ms = c.get_localized_content("ms");
        assert_eq!(ms.title, "Selamat datang");
        assert_eq!(ms.content, json!({"body": "Hello"}));

        let zh = c.get_localized_content("zh");
        assert_eq!(zh.title, "Welcome");
        assert_eq!(zh.content, json!({"body": "你好"}));
    }

    #[test]
    fn test_localization_base_cases() {
        let c = content();
        assert_eq!(c.get_localized_content("en").title, "Welcome");
        assert_eq!(c.get_localized_content("fr").title, "Welcome");

        let mut plain = content();
        plain.translations.clear();
        assert_eq!(plain.get_localized_content("ms").title, "Welcome");
    }

    #[test]
    fn test_english_ignores_en_translation() {
        let mut c = content();
        c.translations.insert(
            0,
            serde_json::from_value(json!({
                "language": "en",
                "title": "EN override",
                "content": {"body": "overridden"}
            }))
            .unwrap(),
        );

        let en = c.get_localized_content("en");
        assert_eq!(en.title, "Welcome");
        assert_eq!(en.content, json!({"body": "Hello"}));
        assert_eq!(en.language, "en");
    }

    #[test]
    fn test_can_user_edit_is_membership_only() {
        let mut c = content();
        assert!(c.can_user_edit(&ViewerRole::Admin));
        assert!(!c.can_user_edit(&ViewerRole::Institution));

        c.permissions.can_edit = vec![Role::Institution];
        assert!(!c.can_user_edit(&ViewerRole::Admin));
        assert!(c.can_user_edit(&ViewerRole::Institution));
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("modal".parse::<ContentType>().unwrap(), ContentType::Modal);
        assert!(matches!("hero".parse::<ContentType>(), Err(AppError::BadRequest(_))));
    }
}
