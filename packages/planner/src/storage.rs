// ABOUTME: Module and functionality storage backed by SQLite
// ABOUTME: CRUD, row mapping, and the idempotent effort upsert used by aggregation

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::effort::ModuleEffort;
use crate::error::{PlannerError, Result};
use crate::types::{
    CreateFunctionalityInput, CreateModuleInput, Functionality, ModuleDetail, ProjectModule,
};

/// Storage for project modules and their functionalities
pub struct ModuleStorage {
    pool: SqlitePool,
}

impl ModuleStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a module under a project. When no priority is given the module
    /// is appended after the project's existing modules.
    pub async fn create_module(
        &self,
        project_id: &str,
        input: CreateModuleInput,
    ) -> Result<ProjectModule> {
        if input.name.trim().is_empty() {
            return Err(PlannerError::InvalidInput("module name is required".to_string()));
        }

        let priority_order = match input.priority_order {
            Some(order) => order,
            None => {
                let row = sqlx::query(
                    "SELECT COALESCE(MAX(priority_order), -1) + 1 AS next_order
                     FROM project_modules WHERE project_id = $1",
                )
                .bind(project_id)
                .fetch_one(&self.pool)
                .await?;
                row.get::<i64, _>("next_order")
            }
        };

        let id = nanoid::nanoid!(8);
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO project_modules
                 (id, project_id, name, description, notes, priority_order, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.notes)
        .bind(priority_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_module(&id).await
    }

    /// Get a module by ID
    pub async fn get_module(&self, module_id: &str) -> Result<ProjectModule> {
        let row = sqlx::query(
            "SELECT id, project_id, name, description, notes, priority_order,
                    estimated_hours, complexity_metric_score, created_at, updated_at
             FROM project_modules WHERE id = $1",
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PlannerError::ModuleNotFound(module_id.to_string()))?;

        Ok(row_to_module(&row))
    }

    /// List a project's modules in priority order (ties broken by insertion order)
    pub async fn list_modules(&self, project_id: &str) -> Result<Vec<ProjectModule>> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, description, notes, priority_order,
                    estimated_hours, complexity_metric_score, created_at, updated_at
             FROM project_modules
             WHERE project_id = $1
             ORDER BY priority_order, rowid",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_module).collect())
    }

    /// List a project's modules with their functionalities attached
    pub async fn list_module_details(&self, project_id: &str) -> Result<Vec<ModuleDetail>> {
        let modules = self.list_modules(project_id).await?;

        let mut details = Vec::with_capacity(modules.len());
        for module in modules {
            let functionalities = self.list_functionalities(&module.id).await?;
            details.push(ModuleDetail {
                module,
                functionalities,
            });
        }
        Ok(details)
    }

    /// Add a functionality to a module
    pub async fn add_functionality(
        &self,
        module_id: &str,
        input: CreateFunctionalityInput,
    ) -> Result<Functionality> {
        if input.name.trim().is_empty() {
            return Err(PlannerError::InvalidInput(
                "functionality name is required".to_string(),
            ));
        }

        // Fail early with a domain error when the module is missing
        self.get_module(module_id).await?;

        let id = nanoid::nanoid!(8);
        let criteria = serde_json::to_string(&input.acceptance_criteria)?;

        sqlx::query(
            "INSERT INTO functionalities
                 (id, module_id, name, description, category, acceptance_criteria,
                  estimated_hours, complexity_score, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&id)
        .bind(module_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.category)
        .bind(&criteria)
        .bind(input.estimated_hours)
        .bind(input.complexity_score)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT id, module_id, name, description, category, acceptance_criteria,
                    estimated_hours, complexity_score, created_at
             FROM functionalities WHERE id = $1",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_functionality(&row))
    }

    /// List a module's functionalities in insertion order
    pub async fn list_functionalities(&self, module_id: &str) -> Result<Vec<Functionality>> {
        let rows = sqlx::query(
            "SELECT id, module_id, name, description, category, acceptance_criteria,
                    estimated_hours, complexity_score, created_at
             FROM functionalities
             WHERE module_id = $1
             ORDER BY rowid",
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_functionality).collect())
    }

    /// Persist a module's rolled-up effort (idempotent, keyed by module id)
    pub async fn update_module_effort(
        &self,
        module_id: &str,
        effort: &ModuleEffort,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE project_modules
             SET estimated_hours = $1, complexity_metric_score = $2, updated_at = $3
             WHERE id = $4",
        )
        .bind(effort.estimated_hours)
        .bind(effort.complexity_metric_score)
        .bind(Utc::now())
        .bind(module_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::ModuleNotFound(module_id.to_string()));
        }
        Ok(())
    }

    /// Persist a functionality's estimate from the estimation pass
    pub async fn update_functionality_estimate(
        &self,
        functionality_id: &str,
        estimated_hours: f64,
        complexity_score: f64,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE functionalities
             SET estimated_hours = $1, complexity_score = $2
             WHERE id = $3",
        )
        .bind(estimated_hours)
        .bind(complexity_score)
        .bind(functionality_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::InvalidInput(format!(
                "functionality {} not found",
                functionality_id
            )));
        }
        Ok(())
    }

    /// Delete a module; its functionalities cascade
    pub async fn delete_module(&self, module_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM project_modules WHERE id = $1")
            .bind(module_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PlannerError::ModuleNotFound(module_id.to_string()));
        }

        debug!("Deleted module {}", module_id);
        Ok(())
    }
}

fn row_to_module(row: &sqlx::sqlite::SqliteRow) -> ProjectModule {
    ProjectModule {
        id: row.get("id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
        description: row.get("description"),
        notes: row.get("notes"),
        priority_order: row.get("priority_order"),
        estimated_hours: row.get("estimated_hours"),
        complexity_metric_score: row.get("complexity_metric_score"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}

fn row_to_functionality(row: &sqlx::sqlite::SqliteRow) -> Functionality {
    Functionality {
        id: row.get("id"),
        module_id: row.get("module_id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        acceptance_criteria: row
            .get::<Option<String>, _>("acceptance_criteria")
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        estimated_hours: row.get("estimated_hours"),
        complexity_score: row.get("complexity_score"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}
