use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Bearer authentication middleware: validates the token and injects `AuthUser`
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let user_id = state.services.authorization.parse_token(token)?;
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("empty auth header")?
        .to_str()
        .map_err(|_| "invalid auth header")?;

    if value.is_empty() {
        return Err("empty auth header");
    }

    match value.split_once(' ') {
        Some(("Bearer", token)) if token.trim().is_empty() => Err("token is empty"),
        Some(("Bearer", token)) => Ok(token.trim()),
        _ => Err("invalid auth header"),
    }
}
