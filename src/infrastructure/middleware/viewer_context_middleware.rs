// ViewerContext Middleware
// Creates ViewerContext from request headers and injects it into request extensions

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{core::ViewerRole, infrastructure::viewer::viewer::ViewerContext};

pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ViewerContext middleware that creates request-scoped viewer context
pub async fn viewer_context_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let viewer_context = create_viewer_context(request.headers())?;

    tracing::debug!(
        request_id = %viewer_context.request_id,
        role = %viewer_context.role,
        "viewer context created"
    );

    request.extensions_mut().insert(Arc::new(viewer_context));
    Ok(next.run(request).await)
}

/// Build the viewer from headers. A missing role header means a public caller;
/// a role header that is not valid UTF-8 is rejected.
pub fn create_viewer_context(headers: &HeaderMap) -> Result<ViewerContext, StatusCode> {
    let role = match headers.get(USER_ROLE_HEADER) {
        Some(value) => {
            let raw = value.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;
            raw.parse::<ViewerRole>().unwrap_or_default()
        }
        None => ViewerRole::Public,
    };

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let request_id = header(REQUEST_ID_HEADER).unwrap_or_else(|| Uuid::new_v4().to_string());

    let viewer = ViewerContext::new(role, request_id);
    Ok(match header(USER_ID_HEADER) {
        Some(user_id) => viewer.with_user_id(user_id),
        None => viewer,
    })
}
