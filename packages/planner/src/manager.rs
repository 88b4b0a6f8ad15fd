// ABOUTME: Timeline generation orchestration - aggregate, schedule, synthesize, persist
// ABOUTME: Sequential pipeline; the generative call completes before the write transaction begins

use sqlx::SqlitePool;
use tracing::info;

use planora_ai::GenerativeService;
use planora_core::{Project, DEFAULT_MONTHLY_CAPACITY_HOURS};
use planora_storage::{ProjectStorage, StorageError};

use crate::effort::EffortAggregator;
use crate::error::{PlannerError, Result};
use crate::narrative::{NarrativePlan, NarrativeSynthesizer};
use crate::scheduler::{build_schedule, CarryMode, SchedulableModule, SchedulePlan};
use crate::timeline::{PersistedTimeline, TimelineWriter};
use crate::types::ModuleDetail;

/// Options for a timeline generation run
#[derive(Debug, Clone, Copy)]
pub struct GenerateTimelineOptions {
    pub monthly_capacity: f64,
    pub carry_mode: CarryMode,
}

impl Default for GenerateTimelineOptions {
    fn default() -> Self {
        Self {
            monthly_capacity: DEFAULT_MONTHLY_CAPACITY_HOURS,
            carry_mode: CarryMode::default(),
        }
    }
}

/// Orchestrates the full timeline generation pipeline for a project
pub struct TimelineManager {
    pool: SqlitePool,
}

impl TimelineManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate and persist the timeline: aggregate effort, schedule months,
    /// synthesize narrative, write transactionally. An empty schedulable set
    /// persists an empty-summary timeline and makes no generative call.
    pub async fn generate(
        &self,
        project_id: &str,
        service: &GenerativeService,
        options: GenerateTimelineOptions,
    ) -> Result<PersistedTimeline> {
        let project = self.load_project(project_id).await?;

        let rollups = EffortAggregator::new(self.pool.clone())
            .aggregate_project(project_id)
            .await?;

        // A module is schedulable once it has at least one functionality and
        // positive rolled-up hours
        let mut details: Vec<ModuleDetail> = Vec::new();
        let mut schedulable: Vec<SchedulableModule> = Vec::new();
        for rollup in rollups {
            if rollup.detail.functionalities.is_empty() || rollup.effort.estimated_hours <= 0.0 {
                continue;
            }
            schedulable.push(SchedulableModule {
                id: rollup.detail.module.id.clone(),
                name: rollup.detail.module.name.clone(),
                hours: rollup.effort.estimated_hours,
            });
            details.push(rollup.detail);
        }

        let plan = build_schedule(&schedulable, options.monthly_capacity, options.carry_mode)?;
        info!(
            "Scheduled project {}: {} modules over {} months ({} hours total)",
            project_id,
            schedulable.len(),
            plan.months.len(),
            plan.total_hours
        );

        let narrative = if plan.months.is_empty() {
            NarrativePlan {
                summary: String::new(),
                timeline_items: Vec::new(),
            }
        } else {
            self.synthesize(service, &project, &plan, &details).await?
        };

        let writer = TimelineWriter::new(self.pool.clone());
        writer.write(project_id, &narrative).await?;

        writer
            .get_timeline(project_id)
            .await?
            .ok_or_else(|| PlannerError::ProjectNotFound(project_id.to_string()))
    }

    /// Fetch the persisted timeline, or None when never generated
    pub async fn get_timeline(&self, project_id: &str) -> Result<Option<PersistedTimeline>> {
        // Surface a 404-style error for a missing project rather than an
        // empty timeline
        self.load_project(project_id).await?;
        TimelineWriter::new(self.pool.clone())
            .get_timeline(project_id)
            .await
    }

    async fn load_project(&self, project_id: &str) -> Result<Project> {
        ProjectStorage::new(self.pool.clone())
            .get_project(project_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => PlannerError::ProjectNotFound(project_id.to_string()),
                other => PlannerError::Storage(other),
            })
    }

    async fn synthesize(
        &self,
        service: &GenerativeService,
        project: &Project,
        plan: &SchedulePlan,
        details: &[ModuleDetail],
    ) -> Result<NarrativePlan> {
        NarrativeSynthesizer::new()
            .synthesize(service, project, plan, details)
            .await
    }
}
