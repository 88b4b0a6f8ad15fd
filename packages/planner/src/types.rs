// ABOUTME: Type definitions for project modules and functionalities
// ABOUTME: Row-level types plus the create inputs used by storage and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named unit of project work, decomposed into functionalities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModule {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub notes: Option<String>,
    /// Position in the delivery order; ties broken by insertion order
    pub priority_order: i64,
    /// Rolled-up hours; null until functionalities have been estimated
    pub estimated_hours: Option<f64>,
    /// Rolled-up complexity on the 0-10 scale, 2 decimal places
    pub complexity_metric_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An atomic piece of work belonging to exactly one module.
/// Cascade-deleted with its module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Functionality {
    pub id: String,
    pub module_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub acceptance_criteria: Vec<String>,
    pub estimated_hours: Option<f64>,
    /// 0-10 scale, weighted average of criterion sub-scores
    pub complexity_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A module together with its functionality list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub module: ProjectModule,
    pub functionalities: Vec<Functionality>,
}

/// Input for creating a module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleInput {
    pub name: String,
    pub description: String,
    pub notes: Option<String>,
    /// Appended after existing modules when omitted
    pub priority_order: Option<i64>,
}

/// Input for creating a functionality under a module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionalityInput {
    pub name: String,
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    pub estimated_hours: Option<f64>,
    pub complexity_score: Option<f64>,
}

fn default_category() -> String {
    "feature".to_string()
}
