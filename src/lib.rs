// Career Platform - content, career forecast and student-support backend

// Ent Framework - schema, hook and privacy system
pub mod ent_framework;

// Core types and primitives
pub mod core;

// Infrastructure - document store, HTTP middleware, external clients
pub mod infrastructure;

// Schema Definitions - one per collection
pub mod schemas;

// Typed entities and the services built on them
pub mod entities;
pub mod services;

// HTTP surface and process wiring
pub mod app_state;
pub mod config;
pub mod platform_interface;
pub mod startup;

// Common utilities
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
