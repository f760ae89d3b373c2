use crate::core::ViewerRole;

/// Request-scoped identity of the caller.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub role: ViewerRole,
    /// Caller's user id when the client supplies one
    pub user_id: Option<String>,
    pub request_id: String,
}

impl ViewerContext {
    pub fn new(role: ViewerRole, request_id: String) -> Self {
        ViewerContext {
            role,
            user_id: None,
            request_id,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
