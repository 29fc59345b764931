#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::handlers;
use todo_api::store::{to_document, DocumentId, DocumentStore, MemoryStore};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = handlers::router(store.clone());
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, None).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder.body(Body::from(body.unwrap_or_default()))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, value))
    }

    pub async fn insert(&self, collection: &str, record: Value) -> Result<DocumentId> {
        Ok(self.store.insert_one(collection, to_document(&record)?).await?)
    }

    pub async fn insert_with_id(&self, collection: &str, id: DocumentId, record: Value) -> Result<()> {
        Ok(self.store.insert_with_id(collection, id, to_document(&record)?).await?)
    }

    pub async fn count(&self, collection: &str) -> Result<usize> {
        let all = self
            .store
            .find(collection, &todo_api::filter::Predicate::match_all(), None)
            .await?;
        Ok(all.len())
    }
}

/// Three anonymous todos plus Sam's, whose id is returned.
pub async fn seed_todos(app: &TestApp) -> Result<DocumentId> {
    for todo in [
        json!({"owner": "Chris", "category": "Homework", "status": true, "body": "Random words for testing"}),
        json!({"owner": "Lucy", "category": "Software Design", "status": true, "body": "Dog parks are for dogs"}),
        json!({"owner": "Fernando", "category": "Homework", "status": false, "body": "Computers are for humans"}),
    ] {
        app.insert("todos", todo).await?;
    }
    let sams_id = DocumentId::new();
    app.insert_with_id(
        "todos",
        sams_id,
        json!({"owner": "Sam", "category": "Software Design", "status": true, "body": "Sam has an id"}),
    )
    .await?;
    Ok(sams_id)
}

/// Three users plus Sam's, whose id is returned.
pub async fn seed_users(app: &TestApp) -> Result<DocumentId> {
    let avatar = "https://gravatar.com/avatar/?d=mp";
    for user in [
        json!({"name": "Chris", "age": 25, "company": "UMM", "email": "chris@this.that", "role": "admin", "avatar": avatar}),
        json!({"name": "Pat", "age": 37, "company": "IBM", "email": "pat@something.com", "role": "editor", "avatar": avatar}),
        json!({"name": "Jamie", "age": 37, "company": "OHMNET", "email": "jamie@frogs.com", "role": "viewer", "avatar": avatar}),
    ] {
        app.insert("users", user).await?;
    }
    let sams_id = DocumentId::new();
    app.insert_with_id(
        "users",
        sams_id,
        json!({"name": "Sam", "age": 45, "company": "ohmnet", "email": "sam@frogs.com", "role": "viewer", "avatar": avatar}),
    )
    .await?;
    Ok(sams_id)
}

pub fn data_array(body: &Value) -> Vec<Value> {
    body["data"].as_array().cloned().unwrap_or_default()
}

pub fn strings(records: &[Value], field: &str) -> Vec<String> {
    records
        .iter()
        .map(|r| r[field].as_str().unwrap_or_default().to_string())
        .collect()
}
