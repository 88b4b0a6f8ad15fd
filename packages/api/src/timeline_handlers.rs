// ABOUTME: API handlers for timeline generation and retrieval
// ABOUTME: POST runs the full pipeline; GET returns the persisted timeline or null

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use planora_ai::GenerativeService;
use planora_planner::{CarryMode, GenerateTimelineOptions, TimelineManager};
use planora_storage::DbState;

use crate::modules_handlers::planner_error_response;

/// Optional overrides for a generation run
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTimelineRequest {
    pub monthly_capacity: Option<f64>,
    pub carry_mode: Option<CarryMode>,
}

/// POST /api/projects/:id/timeline
pub async fn generate_timeline(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
    body: Option<Json<GenerateTimelineRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let mut options = GenerateTimelineOptions::default();
    if let Some(capacity) = request.monthly_capacity {
        options.monthly_capacity = capacity;
    }
    if let Some(mode) = request.carry_mode {
        options.carry_mode = mode;
    }

    info!(
        "Generating timeline for project {} (capacity {}h, {:?})",
        project_id, options.monthly_capacity, options.carry_mode
    );

    let service = GenerativeService::new();
    match TimelineManager::new(db.pool.clone())
        .generate(&project_id, &service, options)
        .await
    {
        Ok(timeline) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": { "timeline": timeline }
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to generate timeline", e),
    }
}

/// GET /api/projects/:id/timeline
pub async fn get_timeline(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    match TimelineManager::new(db.pool.clone())
        .get_timeline(&project_id)
        .await
    {
        Ok(timeline) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": { "timeline": timeline }
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to fetch timeline", e),
    }
}
