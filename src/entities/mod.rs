// Typed entities - one struct per collection, persisted through EntRepository

pub mod content_privacy;
pub mod ent_career_forecast;
pub mod ent_content;
pub mod ent_feedback;
pub mod ent_search;
pub mod ent_video_pool;

pub use ent_career_forecast::{CareerForecast, Demand, Trend};
pub use ent_content::{Content, ContentType, LocalizedContent};
pub use ent_feedback::{ChatAgentFeedback, SummaryFeedback, SupportQuery, SupportStatus};
pub use ent_search::{TopicCount, TopicSearch, UserSearchHistory};
pub use ent_video_pool::{TopicVideoPool, Video};
