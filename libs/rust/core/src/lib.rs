//! Core shared utilities for cloudlab services: tracing bootstrap, config
//! loading, ops routes and trace-context propagation.

use anyhow::Result;
use tracing::info;
use once_cell::sync::OnceCell;
use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider, Resource};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod metrics;
mod propagation;

pub use config::load_config;
pub use metrics::{init_metrics, metrics_handler, track_requests, HttpMetrics};
pub use propagation::{accept_trace_context, inject_trace_context, trace_headers, HeaderExtractor, HeaderInjector};

static TRACER_PROVIDER: OnceCell<Option<SdkTracerProvider>> = OnceCell::new();
static LOGGING_INIT: OnceCell<()> = OnceCell::new();
static NODE_LIVENESS: AtomicBool = AtomicBool::new(true);
static NODE_READINESS: AtomicBool = AtomicBool::new(false);

pub fn mark_ready() { NODE_READINESS.store(true, Ordering::SeqCst); }
pub fn clear_ready() { NODE_READINESS.store(false, Ordering::SeqCst); }
pub fn mark_not_live() { NODE_LIVENESS.store(false, Ordering::SeqCst); }
pub fn is_ready() -> bool { NODE_READINESS.load(Ordering::SeqCst) }
pub fn is_live() -> bool { NODE_LIVENESS.load(Ordering::SeqCst) }

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber: env filter, fmt output and an OTLP span
/// exporter tagged with `service.name = service`. Safe to call twice.
pub fn init_tracing(service: &str) -> Result<()> {
    TRACER_PROVIDER.get_or_try_init(|| -> Result<Option<SdkTracerProvider>> {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let provider = if env_flag("CLOUDLAB_OTEL").unwrap_or(true) { Some(build_provider(service)?) } else { None };
        let otel_layer = provider.as_ref().map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(service.to_string())));
        if let Some(p) = &provider { global::set_tracer_provider(p.clone()); }
        let json = env_flag("CLOUDLAB_JSON_LOG").unwrap_or(false);
        let json_layer = json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
        });
        let text_layer = (!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
        });
        tracing_subscriber::registry()
            .with(otel_layer)
            .with(env_filter())
            .with(json_layer)
            .with(text_layer)
            .try_init()?;
        Ok(provider)
    })?;
    info!(target: "cloudlab-core", service, "Tracing + OTEL initialized");
    Ok(())
}

fn build_provider(service: &str) -> Result<SdkTracerProvider> {
    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").unwrap_or_else(|_| "http://localhost:4317".into());
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_endpoint)
        .build()?;
    Ok(SdkTracerProvider::builder()
        .with_resource(Resource::builder().with_service_name(service.to_string()).build())
        .with_batch_exporter(exporter)
        .build())
}

/// Plain fmt logging for command-line tools that do not export spans.
pub fn init_logging() {
    LOGGING_INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn shutdown_tracer() {
    if let Some(Some(provider)) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() { tracing::warn!(error=?e, "tracer shutdown failed"); }
    }
}

/// Liveness, readiness, status and metrics routes. Generic over the state of
/// the router they get merged into; none of them read it.
pub fn ops_router<S>(service: &'static str) -> Router<S>
where S: Clone + Send + Sync + 'static {
    Router::new()
        .route("/live", get(|| async { axum::Json(serde_json::json!({"live": is_live()})) }))
        .route("/ready", get(|| async { axum::Json(serde_json::json!({"ready": is_ready()})) }))
        .route("/status", get(move || async move {
            axum::Json(serde_json::json!({
                "service": service,
                "live": is_live(),
                "ready": is_ready(),
            }))
        }))
        .route("/metrics", get(metrics_handler))
}

/// Bind `addr` and serve `app` until ctrl-c.
pub async fn serve(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr=%listener.local_addr()?, "listening");
    mark_ready();
    axum::serve(listener, app)
        .with_graceful_shutdown(async { let _ = tokio::signal::ctrl_c().await; })
        .await?;
    clear_ready();
    Ok(())
}
