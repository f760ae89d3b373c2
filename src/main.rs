// Career Platform Server

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use career_platform::{
    app_state::AppState, config::Config, platform_interface::create_app,
    startup::install_fatal_error_hook,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    install_fatal_error_hook();

    // Load configuration
    let config = Config::from_env()?;
    let addr = config.server_address();

    // Initialize application state
    let app_state = AppState::new(config).await?;
    let app = create_app(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Career platform server listening");
    tracing::info!("API base path: /api/v1 (content, careers, feedback, support, search, videos, ml)");

    axum::serve(listener, app).await?;

    Ok(())
}
