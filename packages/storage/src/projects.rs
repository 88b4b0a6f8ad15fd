// ABOUTME: Project CRUD storage backed by SQLite
// ABOUTME: Row mapping and lifecycle for the project aggregate root

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use planora_core::{
    generate_id, validate_project_create, validate_project_update, Project, ProjectCreateInput,
    ProjectUpdateInput,
};

use crate::error::{StorageError, StorageResult};

/// Storage for projects
pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new project
    pub async fn create_project(&self, input: ProjectCreateInput) -> StorageResult<Project> {
        validate_project_create(&input)
            .map_err(|e| StorageError::InvalidInput(e.to_string()))?;

        let id = generate_id();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO projects (id, name, description, objective, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.objective)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Created project {}", id);
        self.get_project(&id).await
    }

    /// Get a project by ID
    pub async fn get_project(&self, project_id: &str) -> StorageResult<Project> {
        let row = sqlx::query(
            "SELECT id, name, description, objective, created_at, updated_at
             FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("project {}", project_id)))?;

        Ok(row_to_project(&row))
    }

    /// List all projects, newest first
    pub async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT id, name, description, objective, created_at, updated_at
             FROM projects ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_project).collect())
    }

    /// Update a project's mutable fields
    pub async fn update_project(
        &self,
        project_id: &str,
        input: ProjectUpdateInput,
    ) -> StorageResult<Project> {
        validate_project_update(&input)
            .map_err(|e| StorageError::InvalidInput(e.to_string()))?;

        // Confirm the row exists before touching it
        let existing = self.get_project(project_id).await?;

        sqlx::query(
            "UPDATE projects
             SET name = $1, description = $2, objective = $3, updated_at = $4
             WHERE id = $5",
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.description.unwrap_or(existing.description))
        .bind(input.objective.or(existing.objective))
        .bind(Utc::now())
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        self.get_project(project_id).await
    }

    /// Delete a project; modules, functionalities, and timelines cascade
    pub async fn delete_project(&self, project_id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("project {}", project_id)));
        }

        debug!("Deleted project {}", project_id);
        Ok(())
    }
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        objective: row.get("objective"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}
