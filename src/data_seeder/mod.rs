// Sample data for local development and demos

use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub content_created: usize,
    pub content_skipped: usize,
    pub forecasts_created: usize,
}

fn sample_content() -> Vec<Value> {
    vec![
        json!({
            "type": "banner",
            "identifier": "home-hero",
            "title": "Plan your future with confidence",
            "content": {"headline": "Find the right program", "cta": "Get started"},
            "metadata": {"description": "Landing page hero banner", "keywords": ["career", "programs"]},
            "translations": [
                {"language": "ms", "title": "Rancang masa depan anda dengan yakin"}
            ]
        }),
        json!({
            "type": "page",
            "identifier": "about",
            "title": "About the platform",
            "content": {"sections": ["mission", "team"]},
        }),
        json!({
            "type": "notification",
            "identifier": "institution-onboarding",
            "title": "Complete your institution profile",
            "content": {"body": "Add your programs to reach more students."},
            "visibility": {"userTypes": ["institution", "admin"]},
            "permissions": {"canEdit": ["admin", "institution"]}
        }),
        json!({
            "type": "modal",
            "identifier": "admin-maintenance",
            "title": "Scheduled maintenance",
            "content": {"body": "Saturday 02:00-04:00"},
            "visibility": {"isPublic": false},
            "permissions": {"canView": ["admin"]}
        }),
    ]
}

fn sample_forecasts() -> Vec<Value> {
    let jobs = [
        ("Data Scientist", "Technology", 35.0, 85.0, "very-high", "rapidly-growing", vec!["Python", "Statistics", "SQL"]),
        ("Software Engineer", "Technology", 25.0, 90.0, "high", "growing", vec!["Rust", "Systems Design"]),
        ("Registered Nurse", "Healthcare", 12.0, 80.0, "high", "growing", vec!["Patient Care"]),
        ("Accountant", "Finance", 4.0, 75.0, "medium", "stable", vec!["Excel", "Auditing"]),
        ("Data Entry Clerk", "Administration", -15.0, 70.0, "low", "declining", vec!["Typing"]),
    ];

    jobs.into_iter()
        .map(|(title, industry, growth, confidence, demand, trend, skills)| {
            json!({
                "jobTitle": title,
                "industry": industry,
                "requiredSkills": skills,
                "forecast": {
                    "growth": growth,
                    "confidence": confidence,
                    "demand": demand,
                    "trend": trend,
                    "timeframe": "5-year"
                }
            })
        })
        .collect()
}

/// Insert the sample set. Content that already exists is skipped, so the
/// seeder can be re-run against the same database.
pub async fn seed_sample_data(state: &AppState) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for doc in sample_content() {
        match state.content.create(doc).await {
            Ok(_) => summary.content_created += 1,
            Err(AppError::Conflict(reason)) => {
                tracing::debug!(%reason, "sample content already present");
                summary.content_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if state.careers.get_trending_jobs(Some(1)).await?.is_empty() {
        for doc in sample_forecasts() {
            state.careers.create(doc).await?;
            summary.forecasts_created += 1;
        }
    }

    tracing::info!(?summary, "sample data seeded");
    Ok(summary)
}
