//! Three-route users service backed by Postgres.

use axum::{extract::State, http::StatusCode, middleware, response::{IntoResponse, Response}, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

pub mod settings;
pub mod store;

pub use settings::Settings;
pub use store::{PgUserStore, StoreError, User, UserStore};

pub const SERVICE: &str = "users-api";
pub const GREETING: &str = "Hello from AWS Flask app with PostgreSQL + ASG + ALB!\n";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: impl UserStore + 'static) -> Self { Self { store: Arc::new(store) } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/users", get(users))
        .merge(cloudlab_core::ops_router(SERVICE))
        .layer(middleware::from_fn_with_state(SERVICE, cloudlab_core::track_requests))
        .layer(middleware::from_fn(cloudlab_core::accept_trace_context))
        .with_state(state)
}

async fn index() -> &'static str { GREETING }

async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({"status": "healthy"})).into_response(),
        Err(e) => {
            tracing::warn!(error=%e, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"status": "unhealthy", "error": e.to_string()}))).into_response()
        }
    }
}

async fn users(State(state): State<AppState>) -> Response {
    match state.store.list_users().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            tracing::error!(error=%e, "listing users failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}
