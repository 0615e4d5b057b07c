//! Frontend -> backend -> database demo. Each tier is its own process and
//! service name; requests between them carry W3C trace context so one page
//! load shows up as a single trace.

use axum::{extract::State, http::StatusCode, middleware, response::{IntoResponse, Response}, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::json;

mod upstream;
pub use upstream::{Upstream, UpstreamError};

pub const FRONTEND: &str = "frontend";
pub const BACKEND: &str = "backend";
pub const DATABASE: &str = "database";

/// `bind_addr` plus, for tiers with a dependency, `upstream_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct TierSettings {
    pub service_name: String,
    pub bind_addr: String,
    /// Only ever read from the tier's own variable, never from a shared key.
    #[serde(skip)]
    pub upstream_url: Option<String>,
}

impl TierSettings {
    /// `upstream` pairs the variable holding the next tier's base URL
    /// (`BACKEND_URL`, `DATABASE_URL`) with its in-cluster default.
    pub fn load(service: &str, bind_addr: &str, upstream: Option<(&str, &str)>) -> anyhow::Result<Self> {
        let mut settings: Self = cloudlab_core::load_config(service, None, &[("bind_addr", bind_addr)])?;
        settings.upstream_url = upstream.map(|(var, default_url)| std::env::var(var).unwrap_or_else(|_| default_url.to_string()));
        Ok(settings)
    }
}

fn upstream_failure(e: UpstreamError) -> Response {
    tracing::error!(error=%e, "upstream call failed");
    (StatusCode::BAD_GATEWAY, Json(json!({"error": e.to_string()}))).into_response()
}

fn instrumented<S: Clone + Send + Sync + 'static>(service: &'static str, routes: Router<S>) -> Router<S> {
    routes
        .merge(cloudlab_core::ops_router(service))
        .layer(middleware::from_fn_with_state(service, cloudlab_core::track_requests))
        .layer(middleware::from_fn(cloudlab_core::accept_trace_context))
}

pub fn frontend_router(backend: Upstream) -> Router {
    instrumented(FRONTEND, Router::new().route("/", get(frontend_root))).with_state(backend)
}

pub fn backend_router(database: Upstream) -> Router {
    instrumented(BACKEND, Router::new().route("/data", get(backend_data))).with_state(database)
}

pub fn database_router() -> Router {
    instrumented(DATABASE, Router::new().route("/query", get(database_query)))
}

async fn frontend_root(State(backend): State<Upstream>) -> Response {
    match backend.get_json("/data").await {
        Ok(body) => Json(json!({"frontend": "ok", "backend_response": body})).into_response(),
        Err(e) => upstream_failure(e),
    }
}

async fn backend_data(State(database): State<Upstream>) -> Response {
    match database.get_json("/query").await {
        Ok(body) => Json(json!({"backend": "ok", "database": body})).into_response(),
        Err(e) => upstream_failure(e),
    }
}

async fn database_query() -> Json<serde_json::Value> {
    Json(json!({"result": "fake_db_data"}))
}
