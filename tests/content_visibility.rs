use chrono::{Duration, Utc};
use serde_json::{json, Value};

use career_platform::{app_state::AppState, core::ViewerRole, entities::ContentType};

fn banner(identifier: &str, extra: Value) -> Value {
    let mut doc = json!({
        "type": "banner",
        "identifier": identifier,
        "title": identifier,
        "content": {"text": identifier},
    });
    if let (Value::Object(doc), Value::Object(extra)) = (&mut doc, extra) {
        doc.extend(extra);
    }
    doc
}

async fn identifiers_for(state: &AppState, role: ViewerRole) -> Vec<String> {
    let mut ids: Vec<String> = state
        .content
        .get_by_type(ContentType::Banner, &role)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.identifier)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_user_types_restrict_audience() {
    let state = AppState::in_memory().await.unwrap();
    state.content.create(banner("everyone", json!({}))).await.unwrap();
    state
        .content
        .create(banner("institutions", json!({"visibility": {"userTypes": ["institution"]}})))
        .await
        .unwrap();

    assert_eq!(identifiers_for(&state, ViewerRole::Public).await, vec!["everyone"]);
    assert_eq!(
        identifiers_for(&state, ViewerRole::Institution).await,
        vec!["everyone", "institutions"]
    );
}

#[tokio::test]
async fn test_schedule_window_hides_future_and_expired_content() {
    let state = AppState::in_memory().await.unwrap();
    let now = Utc::now();
    state
        .content
        .create(banner("upcoming", json!({"visibility": {"startDate": (now + Duration::days(1)).to_rfc3339()}})))
        .await
        .unwrap();
    state
        .content
        .create(banner("expired", json!({"visibility": {"endDate": (now - Duration::days(1)).to_rfc3339()}})))
        .await
        .unwrap();
    state
        .content
        .create(banner(
            "running",
            json!({"visibility": {
                "startDate": (now - Duration::days(1)).to_rfc3339(),
                "endDate": (now + Duration::days(1)).to_rfc3339()
            }}),
        ))
        .await
        .unwrap();

    assert_eq!(identifiers_for(&state, ViewerRole::Admin).await, vec!["running"]);
}

#[tokio::test]
async fn test_can_view_list_overrides_public_flag() {
    let state = AppState::in_memory().await.unwrap();
    state
        .content
        .create(banner(
            "private-admin",
            json!({"visibility": {"isPublic": false}, "permissions": {"canView": ["admin"]}}),
        ))
        .await
        .unwrap();
    state
        .content
        .create(banner("private", json!({"visibility": {"isPublic": false}})))
        .await
        .unwrap();

    assert_eq!(identifiers_for(&state, ViewerRole::Admin).await, vec!["private-admin"]);
    assert!(identifiers_for(&state, ViewerRole::Regular).await.is_empty());
}

#[tokio::test]
async fn test_unrecognized_role_sees_public_content() {
    let state = AppState::in_memory().await.unwrap();
    state.content.create(banner("open", json!({}))).await.unwrap();
    state
        .content
        .create(banner("members", json!({"visibility": {"userTypes": ["regular"]}})))
        .await
        .unwrap();

    let role: ViewerRole = "superuser".parse().unwrap();
    assert_eq!(identifiers_for(&state, role).await, vec!["open"]);
}

#[tokio::test]
async fn test_localized_lookup_falls_back_to_default_language() {
    let state = AppState::in_memory().await.unwrap();
    state
        .content
        .create(banner(
            "greeting",
            json!({"translations": [{"language": "ms", "title": "Selamat datang"}]}),
        ))
        .await
        .unwrap();

    let ms = state
        .content
        .get_localized_by_identifier("greeting", &ViewerRole::Public, "ms")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ms.title, "Selamat datang");
    assert_eq!(ms.content, json!({"text": "greeting"}));

    let fr = state
        .content
        .get_localized_by_identifier("greeting", &ViewerRole::Public, "fr")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fr.title, "greeting");
}

#[tokio::test]
async fn test_english_request_returns_base_fields_despite_en_translation() {
    let state = AppState::in_memory().await.unwrap();
    state
        .content
        .create(json!({
            "type": "section",
            "identifier": "intro",
            "title": "Base",
            "content": {"b": 1},
            "translations": [{"language": "en", "title": "EN override", "content": {"b": 2}}]
        }))
        .await
        .unwrap();

    let en = state
        .content
        .get_localized_by_identifier("intro", &ViewerRole::Public, "en")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(en.title, "Base");
    assert_eq!(en.content, json!({"b": 1}));
}
