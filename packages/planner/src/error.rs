// ABOUTME: Error types for the planner package
// ABOUTME: Defines all error variants for plan synthesis and scheduling operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Invalid monthly capacity: {0}")]
    InvalidCapacity(f64),

    #[error("Invalid hours for module {module_id}: {hours}")]
    InvalidHours { module_id: String, hours: f64 },

    #[error("Narrative response failed validation: {0}")]
    InvalidNarrative(String),

    #[error("Invalid complexity weights: {0}")]
    InvalidWeights(String),

    #[error("Generative service error: {0}")]
    Generative(#[from] planora_ai::GenerativeError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] planora_storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
