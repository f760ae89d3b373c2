use tracing_subscriber::EnvFilter;

use career_platform::{app_state::AppState, config::Config, data_seeder::seed_sample_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(database = %config.database.url, "Generating sample data");

    let state = AppState::new(config).await?;
    let summary = seed_sample_data(&state).await?;

    tracing::info!(
        content_created = summary.content_created,
        content_skipped = summary.content_skipped,
        forecasts_created = summary.forecasts_created,
        "Sample data ready"
    );
    Ok(())
}
