use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Credentials, NewUser};
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/sign-up - register an account, returns `{ "id": <user id> }`
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Value> {
    let user = json_body(payload)?;
    let id = state.services.authorization.create_user(user).await?;

    Ok(ApiResponse::success(json!({ "id": id })))
}

/// POST /auth/sign-in - exchange credentials for a bearer token
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let credentials = json_body(payload)?;
    let token = state
        .services
        .authorization
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    Ok(ApiResponse::success(json!({ "token": token })))
}
