// ABOUTME: Full-pipeline tests for timeline generation with a mocked generative service
// ABOUTME: Covers manager orchestration, empty projects, and narrative schema failures

use planora_ai::GenerativeService;
use planora_planner::{
    CreateFunctionalityInput, CreateModuleInput, GenerateTimelineOptions, ModuleStorage,
    PlannerError, TimelineManager,
};
use planora_storage::{DbState, ProjectStorage};
use sqlx::SqlitePool;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> SqlitePool {
    DbState::init_in_memory().await.unwrap().pool
}

async fn create_project(pool: &SqlitePool) -> String {
    ProjectStorage::new(pool.clone())
        .create_project(planora_core::ProjectCreateInput {
            name: "Field Service App".to_string(),
            description: "Dispatch and invoicing for repair crews".to_string(),
            objective: None,
        })
        .await
        .unwrap()
        .id
}

async fn create_estimated_module(
    pool: &SqlitePool,
    project_id: &str,
    name: &str,
    hours: f64,
) -> String {
    let storage = ModuleStorage::new(pool.clone());
    let module = storage
        .create_module(
            project_id,
            CreateModuleInput {
                name: name.to_string(),
                description: format!("{} module", name),
                notes: None,
                priority_order: None,
            },
        )
        .await
        .unwrap();
    storage
        .add_functionality(
            &module.id,
            CreateFunctionalityInput {
                name: format!("{} core", name),
                description: "core behavior".to_string(),
                category: "feature".to_string(),
                acceptance_criteria: vec![],
                estimated_hours: Some(hours),
                complexity_score: Some(5.0),
            },
        )
        .await
        .unwrap();
    module.id
}

fn messages_response(text: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": 100, "output_tokens": 200}
    }))
}

async fn mock_service(server: &MockServer) -> GenerativeService {
    GenerativeService::with_api_key("test-key".to_string()).with_api_url(server.uri())
}

#[tokio::test]
async fn test_generate_persists_timeline_with_associations() {
    let pool = setup().await;
    let project_id = create_project(&pool).await;
    let dispatch_id = create_estimated_module(&pool, &project_id, "Dispatch", 100.0).await;
    let invoicing_id = create_estimated_module(&pool, &project_id, "Invoicing", 100.0).await;

    let narrative = serde_json::json!({
        "summary": "Two busy months.",
        "timeline_items": [
            {"month_number": 1, "title": "Dispatch first", "summary": "Dispatch lands.",
             "module_ids": [dispatch_id, invoicing_id]},
            {"month_number": 2, "title": "Invoicing", "summary": "Invoicing finishes.",
             "module_ids": [invoicing_id]}
        ]
    });

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(messages_response(narrative.to_string()))
        .mount(&server)
        .await;

    let manager = TimelineManager::new(pool.clone());
    let timeline = manager
        .generate(
            &project_id,
            &mock_service(&server).await,
            GenerateTimelineOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(timeline.summary, "Two busy months.");
    assert_eq!(timeline.items.len(), 2);
    assert_eq!(timeline.items[0].modules.len(), 2);
    assert_eq!(timeline.items[1].modules.len(), 1);
    assert_eq!(timeline.items[1].modules[0].id, invoicing_id);

    // Aggregation persisted hours onto the module rows along the way
    let module = ModuleStorage::new(pool.clone())
        .get_module(&dispatch_id)
        .await
        .unwrap();
    assert_eq!(module.estimated_hours, Some(100.0));
}

#[tokio::test]
async fn test_generate_empty_project_writes_empty_summary_timeline() {
    // Scenario: no schedulable modules. No generative call is made and the
    // persisted timeline has an empty summary and no items.
    let pool = setup().await;
    let project_id = create_project(&pool).await;

    let server = MockServer::start().await;
    // No mocks mounted: any request to the server would 404 and fail the run

    let manager = TimelineManager::new(pool.clone());
    let timeline = manager
        .generate(
            &project_id,
            &mock_service(&server).await,
            GenerateTimelineOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(timeline.summary, "");
    assert!(timeline.items.is_empty());
}

#[tokio::test]
async fn test_generate_rejects_malformed_narrative() {
    let pool = setup().await;
    let project_id = create_project(&pool).await;
    create_estimated_module(&pool, &project_id, "Dispatch", 100.0).await;

    // Month number outside the scheduled range fails validation
    let narrative = serde_json::json!({
        "summary": "Bad months.",
        "timeline_items": [
            {"month_number": 9, "title": "Too far", "summary": "Nope.", "module_ids": []}
        ]
    });

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(messages_response(narrative.to_string()))
        .mount(&server)
        .await;

    let manager = TimelineManager::new(pool.clone());
    let err = manager
        .generate(
            &project_id,
            &mock_service(&server).await,
            GenerateTimelineOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidNarrative(_)));

    // Nothing was persisted: validation happens before the write transaction
    let timeline = manager.get_timeline(&project_id).await.unwrap();
    assert!(timeline.is_none());
}

#[tokio::test]
async fn test_generate_missing_project_is_not_found() {
    let pool = setup().await;
    let server = MockServer::start().await;

    let manager = TimelineManager::new(pool.clone());
    let err = manager
        .generate(
            "missing1",
            &mock_service(&server).await,
            GenerateTimelineOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::ProjectNotFound(_)));
}

#[tokio::test]
async fn test_get_timeline_missing_project_is_not_found() {
    let pool = setup().await;
    let manager = TimelineManager::new(pool.clone());
    let err = manager.get_timeline("missing1").await.unwrap_err();
    assert!(matches!(err, PlannerError::ProjectNotFound(_)));
}
