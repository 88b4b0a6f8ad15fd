// ABOUTME: Shared project types used across storage, planner, and API packages
// ABOUTME: Defines the Project aggregate root and its create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project: the root aggregate a plan is generated for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// What the project is trying to achieve, fed into generative prompts
    pub objective: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateInput {
    pub name: String,
    pub description: String,
    pub objective: Option<String>,
}

/// Input for updating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
}
