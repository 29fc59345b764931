mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use todo_api::store::DocumentId;

use common::{data_array, seed_todos, strings, TestApp};

#[tokio::test]
async fn lists_every_todo_sorted_by_owner() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos").await?;
    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["success"], true);

    let todos = data_array(&body);
    assert_eq!(todos.len(), app.count("todos").await?);
    assert_eq!(strings(&todos, "owner"), vec!["Chris", "Fernando", "Lucy", "Sam"]);
    Ok(())
}

#[tokio::test]
async fn filters_by_category() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?category=Homework").await?;
    assert_eq!(status, StatusCode::OK);
    let todos = data_array(&body);
    assert_eq!(todos.len(), 2);
    assert!(todos.iter().all(|t| t["category"] == "Homework"));
    Ok(())
}

#[tokio::test]
async fn filters_by_status() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (_, body) = app.get("/api/todos?status=false").await?;
    let todos = data_array(&body);
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["owner"], "Fernando");

    let (_, body) = app.get("/api/todos?status=true").await?;
    let todos = data_array(&body);
    assert_eq!(todos.len(), 3);
    assert!(todos.iter().all(|t| t["status"] == true));
    Ok(())
}

#[tokio::test]
async fn category_and_status_intersect() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?category=Homework&status=true").await?;
    assert_eq!(status, StatusCode::OK);
    let todos = data_array(&body);
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["category"], "Homework");
    assert_eq!(todos[0]["status"], true);
    Ok(())
}

#[tokio::test]
async fn three_seeded_todos_intersect_to_one() -> Result<()> {
    let app = TestApp::new();
    for (category, status) in [("Homework", true), ("Homework", false), ("Software Design", true)] {
        app.insert("todos", json!({"owner": "o", "body": "b", "category": category, "status": status}))
            .await?;
    }

    let (_, body) = app.get("/api/todos?category=Homework&status=true").await?;
    assert_eq!(data_array(&body).len(), 1);
    Ok(())
}

#[tokio::test]
async fn non_boolean_status_filter_is_rejected() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?status=Complete").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap_or_default().contains("status"));
    Ok(())
}

#[tokio::test]
async fn unrecognized_params_are_ignored() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?owner=Nobody&limit=1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_array(&body).len(), 4);
    Ok(())
}

#[tokio::test]
async fn sortorder_desc_reverses_ordering() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (_, asc) = app.get("/api/todos?sortby=body").await?;
    let (_, desc) = app.get("/api/todos?sortby=body&sortorder=desc").await?;

    let mut ascending = strings(&data_array(&asc), "body");
    let descending = strings(&data_array(&desc), "body");
    assert_eq!(ascending.first().map(String::as_str), Some("Computers are for humans"));
    ascending.reverse();
    assert_eq!(ascending, descending);
    Ok(())
}

#[tokio::test]
async fn unknown_sortorder_token_sorts_ascending() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?sortorder=sideways").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(strings(&data_array(&body), "owner"), vec!["Chris", "Fernando", "Lucy", "Sam"]);
    Ok(())
}

#[tokio::test]
async fn empty_result_is_success() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get("/api/todos?category=Gardening").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().is_some_and(|a| a.is_empty()));
    Ok(())
}

#[tokio::test]
async fn gets_todo_by_id() -> Result<()> {
    let app = TestApp::new();
    let sams_id = seed_todos(&app).await?;

    let (status, body) = app.get(&format!("/api/todos/{}", sams_id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], sams_id.to_string());
    assert_eq!(body["data"]["owner"], "Sam");
    Ok(())
}

#[tokio::test]
async fn illegal_id_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, _) = app.get("/api/todos/bad").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn absent_id_is_not_found() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, body) = app.get(&format!("/api/todos/{}", DocumentId::new())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn creates_todo_and_returns_id() -> Result<()> {
    let app = TestApp::new();
    let new_todo = json!({
        "owner": "Test Todo",
        "status": true,
        "body": "test body",
        "category": "testers"
    });

    let (status, body) = app.post("/api/todos", new_todo.clone()).await?;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["data"].as_object().map(|o| o.len()), Some(1));

    let (status, body) = app.get(&format!("/api/todos/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    let mut stored = body["data"].clone();
    if let Some(todo) = stored.as_object_mut() {
        todo.remove("_id");
    }
    assert_eq!(stored, new_todo);
    Ok(())
}

#[tokio::test]
async fn create_rejects_invalid_todos_without_persisting() -> Result<()> {
    let app = TestApp::new();
    let cases = [
        ("status", json!({"owner": "Test Todo", "category": "testers", "status": "Complete", "body": "test body"})),
        ("owner", json!({"category": "testers", "status": false, "body": "test"})),
        ("owner", json!({"owner": "", "category": "testers", "status": true, "body": "test"})),
        ("category", json!({"owner": "Test Todo", "status": false, "body": "test"})),
        ("category", json!({"owner": "Test Todo", "category": "", "status": true, "body": "test"})),
        ("body", json!({"owner": "Test Todo", "category": "Homework", "status": true})),
        ("body", json!({"owner": "Test Todo", "category": "Homework", "status": true, "body": ""})),
    ];

    for (field, candidate) in cases {
        let (status, body) = app.post("/api/todos", candidate).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected rejection for {}", field);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"].get(field).is_some(), "{} not reported: {}", field, body);
    }

    assert_eq!(app.count("todos").await?, 0);
    Ok(())
}

#[tokio::test]
async fn create_rejects_malformed_json() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post_raw("/api/todos", r#"{"owner": "Test Todo", "status": false "body": "x"}"#).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = app.post("/api/todos", json!(["not", "an", "object"])).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"].get("body").is_some());
    Ok(())
}

#[tokio::test]
async fn deletes_todo() -> Result<()> {
    let app = TestApp::new();
    let sams_id = seed_todos(&app).await?;
    let uri = format!("/api/todos/{}", sams_id);

    let (status, _) = app.delete(&uri).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("todos").await?, 3);

    let (status, _) = app.get(&uri).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_absent_todo_still_succeeds() -> Result<()> {
    let app = TestApp::new();
    seed_todos(&app).await?;

    let (status, _) = app.delete(&format!("/api/todos/{}", DocumentId::new())).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("todos").await?, 4);
    Ok(())
}
