// Launcher - verifies the deployment layout, then runs the configured start command

use tracing_subscriber::EnvFilter;

use career_platform::{
    config::Config,
    startup::{install_fatal_error_hook, StartupGuard},
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    install_fatal_error_hook();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let plan = match StartupGuard::new(config.launch).preflight() {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    match plan.run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
