// ABOUTME: Effort aggregation - rolls functionality hours and complexity up to module totals
// ABOUTME: Pure computation plus an idempotent per-module persistence pass

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::storage::ModuleStorage;
use crate::types::{Functionality, ModuleDetail};
use crate::weights::round2;

/// Per-module rolled-up effort
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEffort {
    pub estimated_hours: f64,
    pub complexity_metric_score: f64,
}

/// A module with its functionalities and computed effort
#[derive(Debug, Clone)]
pub struct ModuleRollup {
    pub detail: ModuleDetail,
    pub effort: ModuleEffort,
}

/// Aggregates functionality-level effort into module totals
pub struct EffortAggregator {
    pool: SqlitePool,
}

impl EffortAggregator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Compute a module's effort from its functionality list. Null hours
    /// count as zero; the complexity score is the mean of the non-null
    /// scores, rounded to 2 decimal places. Both are zero for a module with
    /// no functionalities.
    pub fn compute(functionalities: &[Functionality]) -> ModuleEffort {
        let estimated_hours: f64 = functionalities
            .iter()
            .map(|f| f.estimated_hours.unwrap_or(0.0))
            .sum();

        let scores: Vec<f64> = functionalities
            .iter()
            .filter_map(|f| f.complexity_score)
            .collect();
        let complexity_metric_score = if scores.is_empty() {
            0.0
        } else {
            round2(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        ModuleEffort {
            estimated_hours: round2(estimated_hours),
            complexity_metric_score,
        }
    }

    /// Aggregate every module of a project and persist the totals onto the
    /// module rows (idempotent upsert keyed by module id).
    pub async fn aggregate_project(&self, project_id: &str) -> Result<Vec<ModuleRollup>> {
        let storage = ModuleStorage::new(self.pool.clone());
        let details = storage.list_module_details(project_id).await?;

        let mut rollups = Vec::with_capacity(details.len());
        for detail in details {
            let effort = Self::compute(&detail.functionalities);
            storage.update_module_effort(&detail.module.id, &effort).await?;
            rollups.push(ModuleRollup { detail, effort });
        }

        debug!(
            "Aggregated effort for {} modules of project {}",
            rollups.len(),
            project_id
        );
        Ok(rollups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn functionality(hours: Option<f64>, score: Option<f64>) -> Functionality {
        Functionality {
            id: "fn000001".to_string(),
            module_id: "mod00001".to_string(),
            name: "Login".to_string(),
            description: "Email/password login".to_string(),
            category: "feature".to_string(),
            acceptance_criteria: vec![],
            estimated_hours: hours,
            complexity_score: score,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_compute_sums_hours_null_as_zero() {
        let fns = vec![
            functionality(Some(10.0), Some(4.0)),
            functionality(None, Some(6.0)),
            functionality(Some(5.5), None),
        ];
        let effort = EffortAggregator::compute(&fns);
        assert_eq!(effort.estimated_hours, 15.5);
        // mean of 4.0 and 6.0; the null score is not part of the mean
        assert_eq!(effort.complexity_metric_score, 5.0);
    }

    #[test]
    fn test_compute_empty_module_is_zero() {
        let effort = EffortAggregator::compute(&[]);
        assert_eq!(effort.estimated_hours, 0.0);
        assert_eq!(effort.complexity_metric_score, 0.0);
    }

    #[test]
    fn test_compute_rounds_to_two_decimals() {
        let fns = vec![
            functionality(Some(1.0), Some(5.0)),
            functionality(Some(1.0), Some(6.0)),
            functionality(Some(1.0), Some(6.0)),
        ];
        let effort = EffortAggregator::compute(&fns);
        // (5 + 6 + 6) / 3 = 5.666...
        assert_eq!(effort.complexity_metric_score, 5.67);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let fns = vec![
            functionality(Some(12.25), Some(3.3)),
            functionality(Some(7.75), Some(8.1)),
        ];
        let first = EffortAggregator::compute(&fns);
        let second = EffortAggregator::compute(&fns);
        assert_eq!(first, second);
    }
}
