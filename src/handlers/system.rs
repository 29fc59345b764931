use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::resources::{Resource, Todo, User};
use crate::store::DocumentStore;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API",
            "version": version,
            "endpoints": {
                "health": "/health",
                "todos": format!("/api/{}[/:id]", Todo::COLLECTION),
                "users": format!("/api/{}[/:id]", User::COLLECTION),
            },
            "filters": {
                "todos": field_names::<Todo>(),
                "users": field_names::<User>(),
                "sort": ["sortby", "sortorder"],
            }
        }
    }))
}

fn field_names<R: Resource>() -> Vec<&'static str> {
    R::QUERY_FIELDS.iter().map(|f| f.name).collect()
}

/// GET /health - 503 when the store cannot be reached
pub async fn health(State(store): State<Arc<dyn DocumentStore>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
