// ABOUTME: Endpoint tests for the Planora REST API
// ABOUTME: Drives the router in-process with oneshot requests against an in-memory database

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use planora_storage::DbState;
use tower::ServiceExt;

async fn app() -> axum::Router {
    let db = DbState::init_in_memory().await.unwrap();
    planora_api::create_router(db)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .await
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_fetch_project() {
    let app = app().await;

    let create = Request::post("/api/projects")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Helpdesk",
                "description": "Ticketing for small teams"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let project_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::get(format!("/api/projects/{}", project_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Helpdesk");
}

#[tokio::test]
async fn test_missing_project_returns_404() {
    let response = app()
        .await
        .oneshot(
            Request::get("/api/projects/missing1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_project_rejects_empty_name() {
    let create = Request::post("/api/projects")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"name": "  ", "description": "x"}).to_string(),
        ))
        .unwrap();
    let response = app().await.oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeline_is_null_before_generation() {
    let app = app().await;

    let create = Request::post("/api/projects")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Helpdesk",
                "description": "Ticketing for small teams"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    let project_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::get(format!("/api/projects/{}/timeline", project_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["timeline"].is_null());
}

#[tokio::test]
async fn test_module_crud_through_api() {
    let app = app().await;

    let create = Request::post("/api/projects")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"name": "Shop", "description": "Store"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    let project_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let create_module = Request::post(format!("/api/projects/{}/modules", project_id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"name": "Catalog", "description": "Product catalog"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create_module).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let module_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let add_functionality = Request::post(format!(
        "/api/projects/{}/modules/{}/functionalities",
        project_id, module_id
    ))
    .header("content-type", "application/json")
    .body(Body::from(
        serde_json::json!({
            "name": "Browse",
            "description": "Browse products",
            "estimatedHours": 24.0
        })
        .to_string(),
    ))
    .unwrap();
    let response = app.clone().oneshot(add_functionality).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::get(format!("/api/projects/{}/modules", project_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["functionalities"][0]["name"], "Browse");
}
