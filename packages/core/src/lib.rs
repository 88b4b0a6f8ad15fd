// ABOUTME: Core types, constants, and utilities for Planora
// ABOUTME: Foundational package providing shared functionality across all Planora packages

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{Project, ProjectCreateInput, ProjectUpdateInput};

// Re-export constants
pub use constants::{planora_db_file, planora_dir, DEFAULT_MONTHLY_CAPACITY_HOURS};

// Re-export utilities
pub use utils::generate_id;

// Re-export validation
pub use validation::{truncate, validate_project_create, validate_project_update, ValidationError};
