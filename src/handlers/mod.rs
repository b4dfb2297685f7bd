// Public (no auth) → Protected (bearer token required)
pub mod protected;
pub mod public;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, mapping any rejection to a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("rejected request body: {}", rejection.body_text());
            Err(ApiError::invalid_json("invalid input body"))
        }
    }
}

/// Unwrap a numeric `:id` path segment
pub(crate) fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request("invalid id param"))
}
