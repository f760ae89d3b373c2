// Core types and primitives

pub mod document_path;
pub mod roles;
pub mod strong_types;

pub use roles::{Role, ViewerRole};
pub use strong_types::DocumentId;
