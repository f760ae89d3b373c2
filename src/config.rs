use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub ml_service: MlServiceConfig,
    pub launch: LaunchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Pre-flight checks performed by the launcher before the server starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub manifest: PathBuf,
    pub required_files: Vec<PathBuf>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("launch.json"),
            required_files: vec![PathBuf::from("launch.json"), PathBuf::from("Cargo.toml")],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:career_platform.db".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
            },
            ml_service: MlServiceConfig {
                base_url: "http://localhost:5004".to_string(),
                timeout_secs: 10,
            },
            launch: LaunchConfig::default(),
        }
    }
}

impl Config {
    /// Environment overrides on top of the defaults. Unparseable numbers fall back too.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_env("SERVER_PORT")
                    .or_else(|| parse_env("PORT"))
                    .unwrap_or(defaults.server.port),
            },
            ml_service: MlServiceConfig {
                base_url: env::var("ML_SERVICE_URL").unwrap_or(defaults.ml_service.base_url),
                timeout_secs: parse_env("ML_SERVICE_TIMEOUT_SECS")
                    .unwrap_or(defaults.ml_service.timeout_secs),
            },
            launch: LaunchConfig {
                manifest: env::var("LAUNCH_MANIFEST")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.launch.manifest),
                required_files: env::var("LAUNCH_REQUIRED_FILES")
                    .map(|raw| parse_path_list(&raw))
                    .unwrap_or(defaults.launch.required_files),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

fn parse_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
