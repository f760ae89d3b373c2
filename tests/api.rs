use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use career_platform::{app_state::AppState, platform_interface::create_app};

async fn app() -> Router {
    create_app(AppState::in_memory().await.unwrap())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, role: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(role) = role {
        builder = builder.header("x-user-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, role: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-user-role", role);
    }
    builder.body(Body::empty()).unwrap()
}

fn page(identifier: &str) -> Value {
    json!({
        "type": "page",
        "identifier": identifier,
        "title": "Welcome",
        "content": {"blocks": []}
    })
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = app().await;
    let (status, body) = send(&app, get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_create_content_reports_field_errors() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/content",
            None,
            json!({"identifier": "home", "title": "Home", "content": {}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().unwrap();
    assert!(fields.iter().any(|f| f["field"] == "type"));
}

#[tokio::test]
async fn test_duplicate_identifier_is_conflict() {
    let app = app().await;
    let (status, created) = send(&app, json_request("POST", "/api/v1/content", None, page("home"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["metadata"]["version"], 1);
    assert!(created["_id"].is_string());

    let (status, _) = send(&app, json_request("POST", "/api/v1/content", None, page("home"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_edit_requires_permission() {
    let app = app().await;
    send(&app, json_request("POST", "/api/v1/content", None, page("about"))).await;

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/v1/content/about", Some("regular"), json!({"title": "Hacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request("PUT", "/api/v1/content/about", Some("admin"), json!({"title": "About us"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "About us");
    assert_eq!(body["metadata"]["version"], 2);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/v1/content/missing", Some("admin"), json!({"title": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_header_drives_visibility() {
    let app = app().await;
    let mut restricted = page("staff-only");
    restricted["visibility"] = json!({"userTypes": ["admin"]});
    send(&app, json_request("POST", "/api/v1/content", None, restricted)).await;

    let (status, _) = send(&app, get("/api/v1/content/staff-only", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/v1/content/staff-only", Some("Admin"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identifier"], "staff-only");

    let (status, body) = send(&app, get("/api/v1/content/type/page", Some("admin"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, _) = send(&app, get("/api/v1/content/type/poster", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_view_counter_and_deactivation() {
    let app = app().await;
    send(&app, json_request("POST", "/api/v1/content", None, page("faq"))).await;

    for expected in 1..=2 {
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/content/faq/view", None, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["views"], expected);
    }

    let (status, _) = send(
        &app,
        json_request("POST", "/api/v1/content/faq/deactivate", Some("admin"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/api/v1/content/faq", Some("admin"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_career_search_query_string() {
    let app = app().await;
    for (title, industry) in [("Data Scientist", "Technology"), ("Data Clerk", "Administration")] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/careers",
                None,
                json!({"jobTitle": title, "industry": industry,
                       "forecast": {"growth": 10, "confidence": 80, "demand": "high"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        get("/api/v1/careers/search?q=data&industry=Technology", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["jobTitle"], "Data Scientist");

    let (status, body) = send(&app, get("/api/v1/careers/high-demand?limit=1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_support_and_video_pool_routes() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/support",
            None,
            json!({"name": "Lee", "email": "lee@example.com", "subject": "Help", "message": "Stuck"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "open");

    let (_, body) = send(&app, get("/api/v1/support?status=open", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/api/v1/videos/rust", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/videos/rust",
            None,
            json!({"videos": [{"videoId": "v1", "title": "Intro"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topic"], "rust");
}

#[tokio::test]
async fn test_identifier_shadowed_by_type_route_is_rejected() {
    let app = app().await;
    let (status, body) = send(&app, json_request("POST", "/api/v1/content", None, page("type"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().unwrap();
    assert!(fields.iter().any(|f| f["field"] == "identifier"));
}

#[tokio::test]
async fn test_feedback_finders() {
    let app = app().await;
    for (user, rating) in [("u-1", 5), ("u-2", 3), ("u-1", 4)] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/feedback/chat",
                None,
                json!({"userId": user, "sessionId": "s", "rating": rating}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/feedback/summary",
            None,
            json!({"userId": "u-1", "summaryId": "sum-1", "rating": 2, "helpful": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/v1/feedback/chat/u-1", None)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["userId"] == "u-1"));

    let (_, body) = send(&app, get("/api/v1/feedback/chat/u-1?limit=1", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, get("/api/v1/feedback/summary", None)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["helpful"], false);
}
