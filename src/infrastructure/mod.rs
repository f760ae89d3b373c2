// Core infrastructure modules
pub mod database;              // Document store interface
pub mod sqlite_database;       // SQLite document store
pub mod text_search;           // Weighted text-index scoring
pub mod ml_client;             // Prediction service client
pub mod middleware;            // Request-scoped viewer context
pub mod viewer;                // Viewer context

// Re-export core infrastructure components
pub use database::{CounterUpdate, DocQuery, DocumentStore, FieldFilter, SortKey, StoredDocument};
pub use ml_client::{MlServiceClient, PredictionRequest, PredictionResponse};
pub use sqlite_database::SqliteDocumentStore;
pub use viewer::ViewerContext;
