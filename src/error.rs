use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// A single failed field check, reported back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    QueryFailed(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    Validation(String),
    FieldValidation(Vec<FieldError>),
    SerializationError(String),
    ConfigurationError(String),
    StartupError(String),
    Upstream(String),
    Forbidden(String),
}

impl AppError {
    /// True for failures a caller may retry without changing the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_) | AppError::QueryFailed(_) | AppError::Upstream(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::FieldValidation(errors) => {
                let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Validation failed: {}", joined.join(", "))
            }
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::StartupError(msg) => write!(f, "Startup error: {}", msg),
            AppError::Upstream(msg) => write!(f, "Upstream service error: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let internal = "Internal server error".to_string();
        let (status, error_message) = match &self {
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
            AppError::QueryFailed(msg) => {
                tracing::error!("Query failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Query failed".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::FieldValidation(_) => {
                (StatusCode::BAD_REQUEST, "Validation failed".to_string())
            }
            AppError::SerializationError(msg) => {
                tracing::error!("Serialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
            AppError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
            AppError::StartupError(msg) => {
                tracing::error!("Startup error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream service error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream service unavailable".to_string())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = match &self {
            AppError::FieldValidation(fields) => json!({
                "error": error_message,
                "status": status.as_u16(),
                "fields": fields,
            }),
            _ => json!({
                "error": error_message,
                "status": status.as_u16()
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_validation_display_lists_fields() {
        let err = AppError::FieldValidation(vec![
            FieldError::new("type", "is required"),
            FieldError::new("title", "must be at most 200 characters"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: type: is required, title: must be at most 200 characters"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::FieldValidation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::QueryFailed("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream("down".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_retryable_classes() {
        assert!(AppError::DatabaseError("locked".into()).is_retryable());
        assert!(!AppError::Validation("bad".into()).is_retryable());
    }
}
