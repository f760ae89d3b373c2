// Platform Interface - HTTP surface over the content, career and record services

use std::collections::BTreeMap;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    app_state::AppState,
    entities::{ContentType, SupportStatus},
    error::{AppError, AppResult},
    infrastructure::{
        middleware::{viewer_context_middleware, Vc},
        ml_client::{PredictionRequest, PredictionResponse},
    },
};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupportListQuery {
    pub status: Option<SupportStatus>,
    pub limit: Option<usize>,
}

/// Query-string values arrive as text; booleans and numbers are coerced so
/// they compare equal to the stored JSON values.
fn coerce_filter_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::from(i)
            } else if let Some(f) = raw.parse::<f64>().ok().filter(|f| f.is_finite()) {
                Value::from(f)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

// Health

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.store.health_check().await.is_ok();
    let ml_service = state.ml.health().await;

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if database { "healthy" } else { "unhealthy" },
            "database": database,
            "mlService": ml_service,
        })),
    )
}

// Content

pub async fn content_by_type_handler(
    State(state): State<AppState>,
    vc: Vc,
    AxumPath(content_type): AxumPath<String>,
) -> AppResult<Json<Value>> {
    let content_type: ContentType = content_type.parse()?;
    let items = state.content.get_by_type(content_type, &vc.role).await?;
    Ok(Json(json!({"count": items.len(), "content": items})))
}

pub async fn get_content_handler(
    State(state): State<AppState>,
    vc: Vc,
    AxumPath(identifier): AxumPath<String>,
    Query(params): Query<LanguageQuery>,
) -> AppResult<Json<Value>> {
    let not_found = || AppError::NotFound(format!("Content '{}' not found", identifier));

    match params.lang.as_deref() {
        Some(lang) => {
            let localized = state
                .content
                .get_localized_by_identifier(&identifier, &vc.role, lang)
                .await?
                .ok_or_else(not_found)?;
            Ok(Json(serde_json::to_value(localized)?))
        }
        None => {
            let content = state
                .content
                .get_by_identifier(&identifier, &vc.role)
                .await?
                .ok_or_else(not_found)?;
            Ok(Json(serde_json::to_value(content)?))
        }
    }
}

pub async fn create_content_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let content = state.content.create(body).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

pub async fn update_content_handler(
    State(state): State<AppState>,
    vc: Vc,
    AxumPath(identifier): AxumPath<String>,
    Json(changes): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let content = state
        .content
        .save(&identifier, changes, &vc.role, vc.user_id.as_deref())
        .await?;
    Ok(Json(content))
}

pub async fn view_content_handler(
    State(state): State<AppState>,
    vc: Vc,
    AxumPath(identifier): AxumPath<String>,
) -> AppResult<Json<Value>> {
    let content = state
        .content
        .increment_view(&identifier, &vc.role)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content '{}' not found", identifier)))?;
    Ok(Json(json!({
        "identifier": content.identifier,
        "views": content.analytics.views,
        "lastViewed": content.analytics.last_viewed,
    })))
}

pub async fn deactivate_content_handler(
    State(state): State<AppState>,
    vc: Vc,
    AxumPath(identifier): AxumPath<String>,
) -> AppResult<impl IntoResponse> {
    let content = state
        .content
        .deactivate(&identifier, &vc.role, vc.user_id.as_deref())
        .await?;
    Ok(Json(content))
}

// Careers

pub async fn trending_jobs_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.careers.get_trending_jobs(params.limit).await?))
}

pub async fn high_demand_jobs_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.careers.get_high_demand_jobs(params.limit).await?))
}

/// `q` is the free-text query; every other parameter is an equality filter
pub async fn search_jobs_handler(
    State(state): State<AppState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let text = params.remove("q");
    let filters: BTreeMap<String, Value> = params
        .into_iter()
        .map(|(path, raw)| (path, coerce_filter_value(&raw)))
        .collect();

    Ok(Json(state.careers.search_jobs(text.as_deref(), &filters).await?))
}

pub async fn create_job_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let forecast = state.careers.create(body).await?;
    Ok((StatusCode::CREATED, Json(forecast)))
}

// Records

pub async fn chat_feedback_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let feedback = state.records.submit_chat_feedback(body).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn user_chat_feedback_handler(
    State(state): State<AppState>,
    AxumPath(user_id): AxumPath<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(
        state
            .records
            .chat_feedback_for_user(&user_id, params.limit)
            .await?,
    ))
}

pub async fn summary_feedback_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let feedback = state.records.submit_summary_feedback(body).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn recent_summary_feedback_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.records.recent_summary_feedback(params.limit).await?))
}

pub async fn create_support_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let query = state.records.create_support_query(body).await?;
    Ok((StatusCode::CREATED, Json(query)))
}

pub async fn list_support_handler(
    State(state): State<AppState>,
    Query(params): Query<SupportListQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.records.support_queries(params.status, params.limit).await?))
}

pub async fn topic_search_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let search = state.records.record_topic_search(body).await?;
    Ok((StatusCode::CREATED, Json(search)))
}

pub async fn top_topics_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.records.top_topics(params.limit).await?))
}

pub async fn search_history_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let entry = state.records.record_search(body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn user_search_history_handler(
    State(state): State<AppState>,
    AxumPath(user_id): AxumPath<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(
        state
            .records
            .search_history_for_user(&user_id, params.limit)
            .await?,
    ))
}

pub async fn put_video_pool_handler(
    State(state): State<AppState>,
    AxumPath(topic): AxumPath<String>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.records.upsert_video_pool(&topic, body).await?))
}

pub async fn get_video_pool_handler(
    State(state): State<AppState>,
    AxumPath(topic): AxumPath<String>,
) -> AppResult<impl IntoResponse> {
    let pool = state
        .records
        .video_pool_for_topic(&topic)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No video pool for topic '{}'", topic)))?;
    Ok(Json(pool))
}

// ML

pub async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<PredictionResponse>> {
    Ok(Json(state.ml.predict(&request).await?))
}

/// Routes relative to the API base path
pub fn create_platform_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Content
        .route("/content", post(create_content_handler))
        .route("/content/type/{content_type}", get(content_by_type_handler))
        .route(
            "/content/{identifier}",
            get(get_content_handler).put(update_content_handler),
        )
        .route("/content/{identifier}/view", post(view_content_handler))
        .route("/content/{identifier}/deactivate", post(deactivate_content_handler))
        // Careers
        .route("/careers", post(create_job_handler))
        .route("/careers/trending", get(trending_jobs_handler))
        .route("/careers/high-demand", get(high_demand_jobs_handler))
        .route("/careers/search", get(search_jobs_handler))
        // Records
        .route("/feedback/chat", post(chat_feedback_handler))
        .route("/feedback/chat/{user_id}", get(user_chat_feedback_handler))
        .route(
            "/feedback/summary",
            post(summary_feedback_handler).get(recent_summary_feedback_handler),
        )
        .route("/support", post(create_support_handler).get(list_support_handler))
        .route("/search/topics", post(topic_search_handler))
        .route("/search/topics/top", get(top_topics_handler))
        .route("/search/history", post(search_history_handler))
        .route("/search/history/{user_id}", get(user_search_history_handler))
        .route(
            "/videos/{topic}",
            get(get_video_pool_handler).put(put_video_pool_handler),
        )
        // ML
        .route("/ml/predict", post(predict_handler))
        .layer(middleware::from_fn(viewer_context_middleware))
        .with_state(state)
}

/// Full application: versioned API plus tracing and CORS layers
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", create_platform_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_filter_value() {
        assert_eq!(coerce_filter_value("true"), json!(true));
        assert_eq!(coerce_filter_value("42"), json!(42));
        assert_eq!(coerce_filter_value("2.5"), json!(2.5));
        assert_eq!(coerce_filter_value("Technology"), json!("Technology"));
        assert_eq!(coerce_filter_value("NaN"), json!("NaN"));
    }
}
