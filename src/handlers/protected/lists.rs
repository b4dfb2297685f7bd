use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{NewTodoList, TodoList, UpdateListInput};
use crate::handlers::{json_body, path_id};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/lists
pub async fn create_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewTodoList>, JsonRejection>,
) -> ApiResult<Value> {
    let list = json_body(payload)?;
    let id = state.services.todo_list.create(user.user_id, list).await?;

    Ok(ApiResponse::success(json!({ "id": id })))
}

/// GET /api/lists
pub async fn get_all_lists(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<TodoList>> {
    let lists = state.services.todo_list.get_all(user.user_id).await?;
    Ok(ApiResponse::success(lists))
}

/// GET /api/lists/:id
pub async fn get_list_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<TodoList> {
    let list_id = path_id(id)?;
    let list = state.services.todo_list.get_by_id(user.user_id, list_id).await?;

    Ok(ApiResponse::success(list))
}

/// PUT /api/lists/:id - partial update, absent fields are left unchanged
pub async fn update_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateListInput>, JsonRejection>,
) -> ApiResult<Value> {
    let list_id = path_id(id)?;
    let input = json_body(payload)?;
    state.services.todo_list.update(user.user_id, list_id, input).await?;

    Ok(ApiResponse::success(json!({ "status": "ok" })))
}

/// DELETE /api/lists/:id
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let list_id = path_id(id)?;
    state.services.todo_list.delete(user.user_id, list_id).await?;

    Ok(ApiResponse::success(json!({ "status": "ok" })))
}
