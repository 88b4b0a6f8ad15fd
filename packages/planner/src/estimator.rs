// ABOUTME: Effort estimation pass - assigns hours and complexity scores to functionalities
// ABOUTME: Per-module generative call with ID round-trip and weighted complexity scoring

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use planora_ai::GenerativeService;

use crate::error::Result;
use crate::prompts;
use crate::storage::ModuleStorage;
use crate::weights::{ComplexityWeights, CriterionScores};

/// Structured response schema for the estimation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResponse {
    pub functionalities: Vec<FunctionalityEstimate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalityEstimate {
    /// Functionality ID echoed from the prompt
    pub id: String,
    pub estimated_hours: f64,
    pub criteria: CriterionScores,
}

/// Runs the estimation pass over a project's modules
pub struct EffortEstimator {
    pool: SqlitePool,
    weights: ComplexityWeights,
}

impl EffortEstimator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            weights: ComplexityWeights::standard(),
        }
    }

    pub fn with_weights(pool: SqlitePool, weights: ComplexityWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { pool, weights })
    }

    /// Estimate every functionality of every module in the project. Each
    /// module gets its own generative call; estimates land on the
    /// functionality rows. Returns the number of functionalities updated.
    pub async fn estimate_project(
        &self,
        project_id: &str,
        service: &GenerativeService,
    ) -> Result<usize> {
        let storage = ModuleStorage::new(self.pool.clone());
        let details = storage.list_module_details(project_id).await?;

        let mut updated = 0;
        for detail in &details {
            if detail.functionalities.is_empty() {
                continue;
            }

            let prompt = prompts::estimation_prompt(detail);
            let response = service
                .generate_structured::<EstimationResponse>(
                    prompt,
                    Some(prompts::ESTIMATION_SYSTEM_PROMPT.to_string()),
                )
                .await?;

            let known: Vec<&str> = detail
                .functionalities
                .iter()
                .map(|f| f.id.as_str())
                .collect();

            for estimate in &response.data.functionalities {
                if !known.contains(&estimate.id.as_str()) {
                    warn!(
                        "Estimation for module {} returned unknown functionality id {}, skipping",
                        detail.module.id, estimate.id
                    );
                    continue;
                }
                if !estimate.estimated_hours.is_finite() || estimate.estimated_hours < 0.0 {
                    warn!(
                        "Estimation for functionality {} returned invalid hours {}, skipping",
                        estimate.id, estimate.estimated_hours
                    );
                    continue;
                }

                let score = self.weights.score(&estimate.criteria);
                storage
                    .update_functionality_estimate(&estimate.id, estimate.estimated_hours, score)
                    .await?;
                updated += 1;
            }
        }

        info!(
            "Estimated {} functionalities across {} modules of project {}",
            updated,
            details.len(),
            project_id
        );
        Ok(updated)
    }
}
