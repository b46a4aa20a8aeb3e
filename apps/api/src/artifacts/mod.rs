// Artifact Repository: validated CRUD over the artifacts collection.

pub mod handlers;
pub mod repository;
pub mod validation;
