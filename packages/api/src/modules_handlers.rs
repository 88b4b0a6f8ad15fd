// ABOUTME: API handlers for module breakdown: CRUD, generation, and estimation passes
// ABOUTME: Endpoints for building and estimating a project's module list

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use planora_ai::GenerativeService;
use planora_planner::{
    CreateFunctionalityInput, CreateModuleInput, EffortEstimator, ModuleGenerator, ModuleStorage,
    PlannerError,
};
use planora_storage::{DbState, ProjectStorage, StorageError};

pub(crate) fn planner_error_response(context: &str, e: PlannerError) -> axum::response::Response {
    let status = match &e {
        PlannerError::ProjectNotFound(_) | PlannerError::ModuleNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        PlannerError::InvalidInput(_)
        | PlannerError::InvalidCapacity(_)
        | PlannerError::InvalidHours { .. }
        | PlannerError::InvalidWeights(_) => StatusCode::BAD_REQUEST,
        PlannerError::Generative(_) | PlannerError::InvalidNarrative(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
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

/// GET /api/projects/:id/modules
pub async fn list_modules(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    match ModuleStorage::new(db.pool.clone())
        .list_module_details(&project_id)
        .await
    {
        Ok(details) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": details
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to list modules", e),
    }
}

/// POST /api/projects/:id/modules
pub async fn create_module(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
    Json(input): Json<CreateModuleInput>,
) -> impl IntoResponse {
    match ModuleStorage::new(db.pool.clone())
        .create_module(&project_id, input)
        .await
    {
        Ok(module) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": module
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to create module", e),
    }
}

/// DELETE /api/projects/:id/modules/:module_id
pub async fn delete_module(
    State(db): State<DbState>,
    Path((_project_id, module_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match ModuleStorage::new(db.pool.clone()).delete_module(&module_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": null
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to delete module", e),
    }
}

/// POST /api/projects/:id/modules/:module_id/functionalities
pub async fn add_functionality(
    State(db): State<DbState>,
    Path((_project_id, module_id)): Path<(String, String)>,
    Json(input): Json<CreateFunctionalityInput>,
) -> impl IntoResponse {
    match ModuleStorage::new(db.pool.clone())
        .add_functionality(&module_id, input)
        .await
    {
        Ok(functionality) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": functionality
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to add functionality", e),
    }
}

/// POST /api/projects/:id/modules/generate
pub async fn generate_modules(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    info!("Generating modules for project {}", project_id);

    let project = match ProjectStorage::new(db.pool.clone()).get_project(&project_id).await {
        Ok(project) => project,
        Err(StorageError::NotFound(_)) => {
            return planner_error_response(
                "Failed to generate modules",
                PlannerError::ProjectNotFound(project_id),
            );
        }
        Err(e) => {
            return planner_error_response("Failed to generate modules", PlannerError::Storage(e));
        }
    };

    let service = GenerativeService::new();
    match ModuleGenerator::new(db.pool.clone())
        .generate(&project, &service)
        .await
    {
        Ok(details) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": details
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to generate modules", e),
    }
}

/// POST /api/projects/:id/modules/estimate
pub async fn estimate_modules(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    info!("Estimating modules for project {}", project_id);

    let service = GenerativeService::new();
    match EffortEstimator::new(db.pool.clone())
        .estimate_project(&project_id, &service)
        .await
    {
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": { "updatedFunctionalities": updated }
            })),
        )
            .into_response(),
        Err(e) => planner_error_response("Failed to estimate modules", e),
    }
}
