mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn root_describes_collections() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["endpoints"]["todos"], "/api/todos[/:id]");
    assert_eq!(body["data"]["filters"]["users"], serde_json::json!(["age", "company", "role"]));
    Ok(())
}

#[tokio::test]
async fn health_reports_ok_for_memory_store() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn app_applies_permissive_cors_without_origin_list() -> Result<()> {
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use todo_api::config::SecurityConfig;
    use todo_api::store::MemoryStore;
    use tower::ServiceExt;

    let security = SecurityConfig { enable_cors: true, cors_origins: vec![] };
    let app = todo_api::handlers::app(Arc::new(MemoryStore::new()), &security);

    let request = Request::builder()
        .uri("/api/todos")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
        Some(&b"*"[..])
    );
    Ok(())
}
