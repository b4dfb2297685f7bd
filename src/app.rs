use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::protected::{items, lists};
use crate::handlers::public;
use crate::middleware::jwt_auth_middleware;
use crate::services::Service;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub services: Service,
    pub pool: PgPool,
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected
        .merge(api_routes(state.clone()))
        // Global middleware
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let router = if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(public::sign_up))
        .route("/auth/sign-in", post(public::sign_in))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/lists", get(lists::get_all_lists).post(lists::create_list))
        .route(
            "/api/lists/:id",
            get(lists::get_list_by_id)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route(
            "/api/lists/:id/items",
            get(items::get_all_items).post(items::create_item),
        )
        .route(
            "/api/items/:id",
            get(items::get_item_by_id)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
                .into_response()
        }
    }
}
