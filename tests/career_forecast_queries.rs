use std::collections::BTreeMap;

use serde_json::json;

use career_platform::{app_state::AppState, entities::Demand};

async fn seeded(jobs: &[(&str, &str, f64, f64, &str)]) -> AppState {
    let state = AppState::in_memory().await.unwrap();
    for (title, industry, growth, confidence, demand) in jobs {
        state
            .careers
            .create(json!({
                "jobTitle": title,
                "industry": industry,
                "forecast": {"growth": growth, "confidence": confidence, "demand": demand}
            }))
            .await
            .unwrap();
    }
    state
}

#[tokio::test]
async fn test_trending_orders_by_growth_then_confidence() {
    let state = seeded(&[
        ("A", "Tech", 10.0, 80.0, "medium"),
        ("B", "Tech", 25.0, 90.0, "medium"),
        ("C", "Tech", 25.0, 70.0, "medium"),
        ("D", "Tech", 5.0, 60.0, "medium"),
        ("E", "Tech", 15.0, 50.0, "medium"),
    ])
    .await;

    let trending = state.careers.get_trending_jobs(Some(3)).await.unwrap();
    let ranked: Vec<(f64, f64)> = trending
        .iter()
        .map(|job| (job.forecast.growth, job.forecast.confidence))
        .collect();
    assert_eq!(ranked, vec![(25.0, 90.0), (25.0, 70.0), (15.0, 50.0)]);

    assert_eq!(state.careers.get_trending_jobs(None).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_high_demand_only_includes_high_levels() {
    let state = seeded(&[
        ("Nurse", "Health", 10.0, 70.0, "high"),
        ("Analyst", "Finance", 8.0, 95.0, "very-high"),
        ("Clerk", "Admin", -5.0, 99.0, "low"),
        ("Teacher", "Education", 3.0, 85.0, "medium"),
    ])
    .await;

    let jobs = state.careers.get_high_demand_jobs(None).await.unwrap();
    let titles: Vec<&str> = jobs.iter().map(|job| job.job_title.as_str()).collect();
    assert_eq!(titles, vec!["Analyst", "Nurse"]);
    assert!(jobs
        .iter()
        .all(|job| matches!(job.forecast.demand, Demand::High | Demand::VeryHigh)));
}

#[tokio::test]
async fn test_search_combines_filters_and_text_rank() {
    let state = AppState::in_memory().await.unwrap();
    for doc in [
        json!({"jobTitle": "Data Engineer", "industry": "Technology",
               "requiredSkills": ["SQL"], "forecast": {"growth": 20, "confidence": 60}}),
        json!({"jobTitle": "Backend Developer", "industry": "Technology",
               "description": "Builds data pipelines", "forecast": {"growth": 10, "confidence": 90}}),
        json!({"jobTitle": "Data Clerk", "industry": "Administration",
               "forecast": {"growth": 1, "confidence": 50}}),
        json!({"jobTitle": "Designer", "industry": "Technology",
               "forecast": {"growth": 5, "confidence": 70}}),
    ] {
        state.careers.create(doc).await.unwrap();
    }

    let mut filters = BTreeMap::new();
    filters.insert("industry".to_string(), json!("Technology"));

    let all_tech = state.careers.search_jobs(None, &filters).await.unwrap();
    let titles: Vec<&str> = all_tech.iter().map(|job| job.job_title.as_str()).collect();
    assert_eq!(titles, vec!["Backend Developer", "Designer", "Data Engineer"]);

    // Title matches outrank description matches
    let data_jobs = state.careers.search_jobs(Some("data"), &filters).await.unwrap();
    let titles: Vec<&str> = data_jobs.iter().map(|job| job.job_title.as_str()).collect();
    assert_eq!(titles, vec!["Data Engineer", "Backend Developer"]);

    // Blank text behaves like no text
    assert_eq!(
        state.careers.search_jobs(Some("   "), &filters).await.unwrap().len(),
        3
    );
}
