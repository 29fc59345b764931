use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::resources::{Resource, ResourceController};
use crate::store::DocumentId;

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: DocumentId,
}

/// GET /api/{collection} - filtered, sorted list
pub async fn list<R: Resource>(
    State(controller): State<ResourceController<R>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<R>> {
    let records = controller.list(&params).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/{collection}/:id
pub async fn get_one<R: Resource>(
    State(controller): State<ResourceController<R>>,
    Path(id): Path<String>,
) -> ApiResult<R> {
    let record = controller.get(&id).await?;
    Ok(ApiResponse::success(record))
}

/// POST /api/{collection} - responds with the assigned id only
pub async fn create<R: Resource>(
    State(controller): State<ResourceController<R>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CreatedId> {
    let Json(body) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let id = controller.create(body).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

/// DELETE /api/{collection}/:id - succeeds whether or not the record existed
pub async fn delete<R: Resource>(
    State(controller): State<ResourceController<R>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    controller.delete(&id).await?;
    Ok(ApiResponse::no_content())
}
