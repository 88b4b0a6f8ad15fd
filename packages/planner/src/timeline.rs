// ABOUTME: Timeline persistence - transactional write and read of the synthesized timeline
// ABOUTME: Overwrite-on-regenerate semantics with ID-resolved month-to-module associations

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::error::Result;
use crate::narrative::NarrativePlan;

/// Persisted timeline with its ordered month entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTimeline {
    pub id: String,
    pub project_id: String,
    pub summary: String,
    pub items: Vec<PersistedTimelineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One persisted month entry with its associated modules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTimelineItem {
    pub id: String,
    pub month_number: u32,
    pub title: String,
    pub summary: String,
    pub item_type: String,
    pub modules: Vec<TimelineModuleRef>,
}

/// Reference to a module active in a timeline month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineModuleRef {
    pub id: String,
    pub name: String,
}

/// Result of a timeline write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub timeline_id: String,
    /// Module IDs from the narrative that did not resolve against the
    /// project's module set and were skipped
    pub skipped_associations: usize,
}

/// Writes and reads the persisted timeline for a project
pub struct TimelineWriter {
    pool: SqlitePool,
}

impl TimelineWriter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a narrative plan for a project in one transaction: any
    /// existing timeline is replaced (regeneration overwrites, never
    /// duplicates), then the timeline row, its items in month order, and the
    /// item-module association rows are written. Unknown module IDs are
    /// warned and counted, not silently dropped.
    pub async fn write(&self, project_id: &str, narrative: &NarrativePlan) -> Result<WriteOutcome> {
        let valid_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM project_modules WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(&self.pool)
                .await?;

        let mut items: Vec<_> = narrative.timeline_items.iter().collect();
        items.sort_by_key(|item| item.month_number);

        let timeline_id = nanoid!(8);
        let now = Utc::now();
        let mut skipped = 0;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM timelines WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO timelines (id, project_id, summary, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&timeline_id)
        .bind(project_id)
        .bind(&narrative.summary)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in items {
            let item_id = nanoid!(8);
            sqlx::query(
                "INSERT INTO timeline_items
                     (id, timeline_id, month_number, title, summary, item_type, created_at)
                 VALUES ($1, $2, $3, $4, $5, 'basic', $6)",
            )
            .bind(&item_id)
            .bind(&timeline_id)
            .bind(item.month_number as i64)
            .bind(&item.title)
            .bind(&item.summary)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for module_id in &item.module_ids {
                if !valid_ids.contains(module_id) {
                    warn!(
                        "Narrative referenced unknown module id {} for project {}, skipping association",
                        module_id, project_id
                    );
                    skipped += 1;
                    continue;
                }
                sqlx::query(
                    "INSERT OR IGNORE INTO timeline_item_modules (timeline_item_id, module_id)
                     VALUES ($1, $2)",
                )
                .bind(&item_id)
                .bind(module_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        debug!(
            "Wrote timeline {} for project {} ({} items, {} skipped associations)",
            timeline_id,
            project_id,
            narrative.timeline_items.len(),
            skipped
        );

        Ok(WriteOutcome {
            timeline_id,
            skipped_associations: skipped,
        })
    }

    /// Fetch the persisted timeline for a project, items in month order
    pub async fn get_timeline(&self, project_id: &str) -> Result<Option<PersistedTimeline>> {
        let timeline_row = sqlx::query(
            "SELECT id, project_id, summary, created_at, updated_at
             FROM timelines WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(timeline_row) = timeline_row else {
            return Ok(None);
        };
        let timeline_id: String = timeline_row.get("id");

        let item_rows = sqlx::query(
            "SELECT id, month_number, title, summary, item_type
             FROM timeline_items
             WHERE timeline_id = $1
             ORDER BY month_number",
        )
        .bind(&timeline_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(item_rows.len());
        for row in &item_rows {
            let item_id: String = row.get("id");
            let module_rows = sqlx::query(
                "SELECT m.id, m.name
                 FROM timeline_item_modules tim
                 JOIN project_modules m ON m.id = tim.module_id
                 WHERE tim.timeline_item_id = $1
                 ORDER BY m.priority_order, m.rowid",
            )
            .bind(&item_id)
            .fetch_all(&self.pool)
            .await?;

            items.push(PersistedTimelineItem {
                id: item_id,
                month_number: row.get::<i64, _>("month_number") as u32,
                title: row.get("title"),
                summary: row.get("summary"),
                item_type: row.get("item_type"),
                modules: module_rows
                    .iter()
                    .map(|m| TimelineModuleRef {
                        id: m.get("id"),
                        name: m.get("name"),
                    })
                    .collect(),
            });
        }

        Ok(Some(PersistedTimeline {
            id: timeline_id,
            project_id: timeline_row.get("project_id"),
            summary: timeline_row.get("summary"),
            items,
            created_at: timeline_row.get::<DateTime<Utc>, _>("created_at"),
            updated_at: timeline_row.get::<DateTime<Utc>, _>("updated_at"),
        }))
    }
}
