// Content visibility rules
// Evaluated in order; the first rule that does not Skip decides.

use once_cell::sync::Lazy;

use crate::core::Role;
use crate::ent_framework::{PrivacyContext, PrivacyPolicy, PrivacyResult, PrivacyRule};
use crate::entities::ent_content::Content;

pub static CONTENT_VISIBILITY: Lazy<PrivacyPolicy<Content>> = Lazy::new(|| {
    PrivacyPolicy::new()
        .rule(DenyInactiveRule)
        .rule(ScheduleWindowRule)
        .rule(UserTypeRule)
        .rule(CanViewRule)
        .rule(PublicFlagRule)
});

/// Deactivated content is hidden from everyone
pub struct DenyInactiveRule;

impl PrivacyRule<Content> for DenyInactiveRule {
    fn evaluate(&self, content: &Content, _ctx: &PrivacyContext<'_>) -> PrivacyResult {
        if content.visibility.is_active {
            PrivacyResult::Skip
        } else {
            PrivacyResult::Deny
        }
    }

    fn name(&self) -> &str {
        "deny_inactive"
    }
}

/// Hidden before startDate and after endDate
pub struct ScheduleWindowRule;

impl PrivacyRule<Content> for ScheduleWindowRule {
    fn evaluate(&self, content: &Content, ctx: &PrivacyContext<'_>) -> PrivacyResult {
        let visibility = &content.visibility;
        let not_started = visibility.start_date.is_some_and(|start| ctx.now < start);
        let ended = visibility.end_date.is_some_and(|end| ctx.now > end);

        if not_started || ended {
            PrivacyResult::Deny
        } else {
            PrivacyResult::Skip
        }
    }

    fn name(&self) -> &str {
        "schedule_window"
    }
}

/// A non-empty userTypes list restricts the audience
pub struct UserTypeRule;

impl PrivacyRule<Content> for UserTypeRule {
    fn evaluate(&self, content: &Content, ctx: &PrivacyContext<'_>) -> PrivacyResult {
        let user_types = &content.visibility.user_types;
        if user_types.is_empty()
            || user_types.contains(&Role::All)
            || ctx.role.is_in(user_types)
        {
            PrivacyResult::Skip
        } else {
            PrivacyResult::Deny
        }
    }

    fn name(&self) -> &str {
        "user_type"
    }
}

/// A non-empty canView list decides on its own
pub struct CanViewRule;

impl PrivacyRule<Content> for CanViewRule {
    fn evaluate(&self, content: &Content, ctx: &PrivacyContext<'_>) -> PrivacyResult {
        let can_view = &content.permissions.can_view;
        if can_view.is_empty() {
            PrivacyResult::Skip
        } else if can_view.contains(&Role::Public) || ctx.role.is_in(can_view) {
            PrivacyResult::Allow
        } else {
            PrivacyResult::Deny
        }
    }

    fn name(&self) -> &str {
        "can_view"
    }
}

pub struct PublicFlagRule;

impl PrivacyRule<Content> for PublicFlagRule {
    fn evaluate(&self, content: &Content, _ctx: &PrivacyContext<'_>) -> PrivacyResult {
        if content.visibility.is_public {
            PrivacyResult::Allow
        } else {
            PrivacyResult::Deny
        }
    }

    fn name(&self) -> &str {
        "public_flag"
    }
}
