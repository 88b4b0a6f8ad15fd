// ABOUTME: API handlers for project CRUD
// ABOUTME: Thin wrappers over ProjectStorage with JSON success/error envelopes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use planora_core::{ProjectCreateInput, ProjectUpdateInput};
use planora_storage::{DbState, ProjectStorage, StorageError};

fn storage_error_response(context: &str, e: StorageError) -> axum::response::Response {
    let status = match &e {
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("{}: {:?}", context, e);
    }
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": format!("{}: {}", context, e)
        })),
    )
        .into_response()
}

/// POST /api/projects
pub async fn create_project(
    State(db): State<DbState>,
    Json(input): Json<ProjectCreateInput>,
) -> impl IntoResponse {
    info!("Creating project '{}'", input.name);

    match ProjectStorage::new(db.pool.clone()).create_project(input).await {
        Ok(project) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": project
            })),
        )
            .into_response(),
        Err(e) => storage_error_response("Failed to create project", e),
    }
}

/// GET /api/projects
pub async fn list_projects(State(db): State<DbState>) -> impl IntoResponse {
    match ProjectStorage::new(db.pool.clone()).list_projects().await {
        Ok(projects) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": projects
            })),
        )
            .into_response(),
        Err(e) => storage_error_response("Failed to list projects", e),
    }
}

/// GET /api/projects/:id
pub async fn get_project(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    match ProjectStorage::new(db.pool.clone()).get_project(&project_id).await {
        Ok(project) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": project
            })),
        )
            .into_response(),
        Err(e) => storage_error_response("Failed to fetch project", e),
    }
}

/// PUT /api/projects/:id
pub async fn update_project(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
    Json(input): Json<ProjectUpdateInput>,
) -> impl IntoResponse {
    match ProjectStorage::new(db.pool.clone())
        .update_project(&project_id, input)
        .await
    {
        Ok(project) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": project
            })),
        )
            .into_response(),
        Err(e) => storage_error_response("Failed to update project", e),
    }
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting project {}", project_id);

    match ProjectStorage::new(db.pool.clone()).delete_project(&project_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": null
            })),
        )
            .into_response(),
        Err(e) => storage_error_response("Failed to delete project", e),
    }
}
