// Ent Privacy System - ordered read-access rules over a loaded entity
// Rules are evaluated in order; the first rule that does not Skip decides.

use chrono::{DateTime, Utc};

use crate::core::ViewerRole;

/// Privacy rule context for access control decisions
#[derive(Debug, Clone)]
pub struct PrivacyContext<'a> {
    pub role: &'a ViewerRole,
    pub now: DateTime<Utc>,
}

impl<'a> PrivacyContext<'a> {
    pub fn new(role: &'a ViewerRole, now: DateTime<Utc>) -> Self {
        Self { role, now }
    }
}

/// Privacy rule result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyResult {
    Allow,
    Deny,
    Skip, // Skip this rule, continue to next
}

/// Trait for implementing privacy rules over an entity type
pub trait PrivacyRule<E>: Send + Sync {
    /// Evaluate the privacy rule
    fn evaluate(&self, entity: &E, ctx: &PrivacyContext<'_>) -> PrivacyResult;

    /// Get rule name for debugging
    fn name(&self) -> &str;
}

/// An ordered chain of rules
pub struct PrivacyPolicy<E> {
    rules: Vec<Box<dyn PrivacyRule<E>>>,
}

impl<E> Default for PrivacyPolicy<E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<E> PrivacyPolicy<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: impl PrivacyRule<E> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Evaluate rules in order
    pub fn evaluate(&self, entity: &E, ctx: &PrivacyContext<'_>) -> PrivacyResult {
        for rule in &self.rules {
            match rule.evaluate(entity, ctx) {
                PrivacyResult::Skip => continue,
                decided => {
                    tracing::trace!(rule = rule.name(), result = ?decided, "privacy rule decided");
                    return decided;
                }
            }
        }

        // Default to deny if no rules explicitly allow
        PrivacyResult::Deny
    }

    pub fn allows(&self, entity: &E, ctx: &PrivacyContext<'_>) -> bool {
        self.evaluate(entity, ctx) == PrivacyResult::Allow
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(PrivacyResult, &'static str);

    impl PrivacyRule<()> for Always {
        fn evaluate(&self, _: &(), _: &PrivacyContext<'_>) -> PrivacyResult {
            self.0
        }

        fn name(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn test_first_decisive_rule_wins() {
        let policy = PrivacyPolicy::new()
            .rule(Always(PrivacyResult::Skip, "skip"))
            .rule(Always(PrivacyResult::Allow, "allow"))
            .rule(Always(PrivacyResult::Deny, "deny"));
        let role = ViewerRole::Public;
        assert!(policy.allows(&(), &PrivacyContext::new(&role, Utc::now())));
    }

    #[test]
    fn test_empty_policy_denies() {
        let policy: PrivacyPolicy<()> = PrivacyPolicy::new();
        let role = ViewerRole::Admin;
        assert_eq!(
            policy.evaluate(&(), &PrivacyContext::new(&role, Utc::now())),
            PrivacyResult::Deny
        );
    }
}
