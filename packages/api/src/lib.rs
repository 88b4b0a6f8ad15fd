// ABOUTME: HTTP API layer for Planora providing REST endpoints and routing
// ABOUTME: Integration layer that depends on the storage, planner, and ai packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use planora_storage::DbState;

pub mod modules_handlers;
pub mod projects_handlers;
pub mod timeline_handlers;

/// Creates the projects API router (nested under /api/projects)
pub fn create_projects_router() -> Router<DbState> {
    Router::new()
        .route("/", get(projects_handlers::list_projects))
        .route("/", post(projects_handlers::create_project))
        .route("/{id}", get(projects_handlers::get_project))
        .route("/{id}", put(projects_handlers::update_project))
        .route("/{id}", delete(projects_handlers::delete_project))
        // Module breakdown
        .route("/{id}/modules", get(modules_handlers::list_modules))
        .route("/{id}/modules", post(modules_handlers::create_module))
        .route(
            "/{id}/modules/generate",
            post(modules_handlers::generate_modules),
        )
        .route(
            "/{id}/modules/estimate",
            post(modules_handlers::estimate_modules),
        )
        .route(
            "/{id}/modules/{module_id}",
            delete(modules_handlers::delete_module),
        )
        .route(
            "/{id}/modules/{module_id}/functionalities",
            post(modules_handlers::add_functionality),
        )
        // Timeline generation
        .route("/{id}/timeline", post(timeline_handlers::generate_timeline))
        .route("/{id}/timeline", get(timeline_handlers::get_timeline))
}

/// Creates the full API router with shared database state attached
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .nest("/api/projects", create_projects_router())
        .route("/api/health", get(health))
        .with_state(db)
}

async fn health() -> &'static str {
    "ok"
}
