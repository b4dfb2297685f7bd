use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{NewTodoItem, TodoItem, UpdateItemInput};
use crate::handlers::{json_body, path_id};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/lists/:id/items
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<NewTodoItem>, JsonRejection>,
) -> ApiResult<Value> {
    let list_id = path_id(id)?;
    let item = json_body(payload)?;
    let id = state
        .services
        .todo_item
        .create(user.user_id, list_id, item)
        .await?;

    Ok(ApiResponse::success(json!({ "id": id })))
}

/// GET /api/lists/:id/items
pub async fn get_all_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Vec<TodoItem>> {
    let list_id = path_id(id)?;
    let items = state.services.todo_item.get_all(user.user_id, list_id).await?;

    Ok(ApiResponse::success(items))
}

/// GET /api/items/:id
pub async fn get_item_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<TodoItem> {
    let item_id = path_id(id)?;
    let item = state.services.todo_item.get_by_id(user.user_id, item_id).await?;

    Ok(ApiResponse::success(item))
}

/// PUT /api/items/:id
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateItemInput>, JsonRejection>,
) -> ApiResult<Value> {
    let item_id = path_id(id)?;
    let input = json_body(payload)?;
    state.services.todo_item.update(user.user_id, item_id, input).await?;

    Ok(ApiResponse::success(json!({ "status": "ok" })))
}

/// DELETE /api/items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let item_id = path_id(id)?;
    state.services.todo_item.delete(user.user_id, item_id).await?;

    Ok(ApiResponse::success(json!({ "status": "ok" })))
}
