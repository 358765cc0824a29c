//! Cross-component tests for the Redfish API service facade
//!
//! These tests wire the render engine and the classifier together the way
//! route handlers use them, without starting a server.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use redfish_render_service::classifier::{
    InMemoryNodeDirectory, NodeRecord, Vendor, VendorClassifier,
};
use redfish_render_service::config::Settings;
use redfish_render_service::error::AppError;
use redfish_render_service::render::{InMemorySchemaRegistry, InMemoryViewStore, RenderEngine};
use redfish_render_service::RedfishApiService;

const SYSTEMS_TEMPLATE: &str = r##"{
    "@odata.context": "/redfish/v1/$metadata#Systems",
    "@odata.id": "/redfish/v1/Systems/",
    "@odata.type": "#ComputerSystemCollection.ComputerSystemCollection",
    "Oem": {},
    "Name": "Computer System Collection",
    "Members@odata.count": 1,
    "Members": [
        {"@odata.id": "/redfish/v1/Systems/56c5ce6b283abbcb6c2b6037"}
    ]
}"##;

fn create_test_service() -> RedfishApiService {
    let views = InMemoryViewStore::new();
    views.insert("templateName", SYSTEMS_TEMPLATE).unwrap();

    let directory = Arc::new(InMemoryNodeDirectory::new());
    directory.insert(NodeRecord::new(
        "599337d6ff99ed24305bc58a",
        vec!["1.1.1.0:sys/rack-unit-2".to_string()],
    ));

    RedfishApiService::new(
        RenderEngine::new(Arc::new(views), Arc::new(InMemorySchemaRegistry::new())),
        VendorClassifier::with_builtin_rules(directory),
    )
}

#[tokio::test]
async fn test_get_and_render_without_validation() {
    let service = create_test_service();
    let expected: serde_json::Value = serde_json::from_str(SYSTEMS_TEMPLATE).unwrap();

    let fetched = service.get("templateName", &json!({})).await.unwrap();
    let rendered = service.render("templateName", None, &json!({})).await.unwrap();

    assert_eq!(fetched.to_value(), expected);
    assert_eq!(rendered, fetched);
}

#[tokio::test]
async fn test_vendor_through_service() {
    let service = create_test_service();

    let result = service
        .get_vendor_name_by_id("599337d6ff99ed24305bc58a")
        .await
        .unwrap();
    assert_eq!(result.vendor, Some(Vendor::Cisco));

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["vendor"], "Cisco");
    assert_eq!(body["node"]["id"], "599337d6ff99ed24305bc58a");
}

#[tokio::test]
async fn test_missing_node_becomes_404() {
    let service = create_test_service();

    let err = service.get_vendor_name_by_id("testid").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid node id.");

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_schema_becomes_500() {
    let service = create_test_service();

    let err = service
        .render("templateName", Some("ComputerSystemCollection"), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Render(_)));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_service_from_settings() {
    let root = std::env::temp_dir().join(format!("redfish-service-{}", Uuid::new_v4()));
    let views_dir = root.join("views");
    let schemas_dir = root.join("schemas");
    std::fs::create_dir_all(&views_dir).unwrap();
    std::fs::create_dir_all(&schemas_dir).unwrap();
    std::fs::write(views_dir.join("systems.json"), SYSTEMS_TEMPLATE).unwrap();
    std::fs::write(
        schemas_dir.join("ComputerSystemCollection.json"),
        json!({"type": "object", "required": ["Members"]}).to_string(),
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.views.directory = views_dir.display().to_string();
    settings.schemas.directory = schemas_dir.display().to_string();

    let directory = Arc::new(InMemoryNodeDirectory::new());
    directory.insert(NodeRecord::new("5bc58a", vec!["1234ABC".to_string()]));

    let service = RedfishApiService::from_settings(&settings, directory)
        .await
        .unwrap();

    let doc = service
        .render("systems", Some("ComputerSystemCollection"), &json!({}))
        .await
        .unwrap();
    assert_eq!(doc.name(), Some("Computer System Collection"));

    let classification = service.get_vendor_name_by_id("5bc58a").await.unwrap();
    assert_eq!(classification.vendor, Some(Vendor::Dell));

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_from_settings_missing_schema_dir() {
    let mut settings = Settings::default();
    settings.schemas.directory = std::env::temp_dir()
        .join(format!("redfish-missing-{}", Uuid::new_v4()))
        .display()
        .to_string();

    let result =
        RedfishApiService::from_settings(&settings, Arc::new(InMemoryNodeDirectory::new())).await;
    assert!(matches!(result, Err(AppError::SchemaRegistry(_))));
}
