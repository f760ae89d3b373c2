// Ent Framework - schemas, hooks, privacy rules and typed repositories

pub mod ent_hooks;
pub mod ent_privacy;
pub mod ent_schema;
pub mod ent_trait;

// Re-export all ent framework types for convenience
pub use ent_hooks::{create_default_hook_registry, EntHook, HookContext, HookOperation, HookRegistry, HookTiming};
pub use ent_privacy::{PrivacyContext, PrivacyPolicy, PrivacyResult, PrivacyRule};
pub use ent_schema::*;
pub use ent_trait::{EntRepository, Entity};
