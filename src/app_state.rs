use std::sync::Arc;

use crate::{
    config::Config,
    ent_framework::create_default_hook_registry,
    error::AppResult,
    infrastructure::{
        database::DocumentStore, ml_client::MlServiceClient, sqlite_database::SqliteDocumentStore,
    },
    schemas::create_schema_registry,
    services::{CareerForecastService, ContentService, RecordService},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub content: ContentService,
    pub careers: CareerForecastService,
    pub records: RecordService,
    pub ml: MlServiceClient,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let store = SqliteDocumentStore::connect(
            &config.database.url,
            config.database.max_connections,
        )
        .await?;
        Self::with_store(Arc::new(store), config).await
    }

    /// Fresh in-memory store with default configuration
    pub async fn in_memory() -> AppResult<Self> {
        let store = SqliteDocumentStore::new_in_memory().await?;
        Self::with_store(Arc::new(store), Config::default()).await
    }

    pub async fn with_store(store: Arc<dyn DocumentStore>, config: Config) -> AppResult<Self> {
        let schemas = create_schema_registry();
        schemas.validate().map_err(|errors| {
            crate::error::AppError::ConfigurationError(format!(
                "Invalid schemas: {}",
                errors.join("; ")
            ))
        })?;
        for schema in schemas.all() {
            store.ensure_collection(schema).await?;
        }

        let hooks = Arc::new(create_default_hook_registry());
        let ml = MlServiceClient::new(&config.ml_service)?;

        tracing::info!(collections = ?schemas.collections(), "document store ready");

        Ok(Self {
            content: ContentService::new(store.clone(), hooks.clone()),
            careers: CareerForecastService::new(store.clone(), hooks.clone()),
            records: RecordService::new(store.clone(), hooks),
            ml,
            store,
            config,
        })
    }
}
