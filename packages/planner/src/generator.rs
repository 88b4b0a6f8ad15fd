// ABOUTME: Module generation pass - decomposes a product description into persisted modules
// ABOUTME: Builds the generation prompt, parses the structured response, persists transactionally

use chrono::Utc;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use planora_ai::GenerativeService;
use planora_core::Project;

use crate::error::{PlannerError, Result};
use crate::prompts;
use crate::storage::ModuleStorage;
use crate::types::ModuleDetail;

/// Structured response schema for module generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub modules: Vec<GeneratedModule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedModule {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub functionalities: Vec<GeneratedFunctionality>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFunctionality {
    pub name: String,
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}

fn default_category() -> String {
    "feature".to_string()
}

/// Generates and persists a project's module breakdown
pub struct ModuleGenerator {
    pool: SqlitePool,
}

impl ModuleGenerator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run the generation pass: prompt the generative service with the
    /// project description and persist the returned modules in response
    /// order. Replaces nothing; generated modules append after any existing
    /// ones.
    pub async fn generate(
        &self,
        project: &Project,
        service: &GenerativeService,
    ) -> Result<Vec<ModuleDetail>> {
        let prompt = prompts::module_generation_prompt(project);
        let response = service
            .generate_structured::<GeneratedPlan>(
                prompt,
                Some(prompts::GENERATION_SYSTEM_PROMPT.to_string()),
            )
            .await?;

        let plan = response.data;
        if plan.modules.is_empty() {
            return Err(PlannerError::InvalidInput(
                "generation returned no modules".to_string(),
            ));
        }

        info!(
            "Generated {} modules for project {} ({} tokens)",
            plan.modules.len(),
            project.id,
            response.usage.total_tokens()
        );

        self.persist(&project.id, &plan).await?;

        let storage = ModuleStorage::new(self.pool.clone());
        Ok(storage.list_module_details(&project.id).await?)
    }

    /// Persist a generated plan in one transaction, priority order following
    /// response order after the project's existing modules.
    async fn persist(&self, project_id: &str, plan: &GeneratedPlan) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let base_order: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(priority_order), -1) + 1
             FROM project_modules WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        let now = Utc::now();
        for (index, module) in plan.modules.iter().enumerate() {
            let module_id = nanoid!(8);
            sqlx::query(
                "INSERT INTO project_modules
                     (id, project_id, name, description, notes, priority_order, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(&module_id)
            .bind(project_id)
            .bind(module.name.trim())
            .bind(&module.description)
            .bind(&module.notes)
            .bind(base_order + index as i64)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for functionality in &module.functionalities {
                let criteria = serde_json::to_string(&functionality.acceptance_criteria)?;
                sqlx::query(
                    "INSERT INTO functionalities
                         (id, module_id, name, description, category, acceptance_criteria, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(nanoid!(8))
                .bind(&module_id)
                .bind(functionality.name.trim())
                .bind(&functionality.description)
                .bind(&functionality.category)
                .bind(&criteria)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
