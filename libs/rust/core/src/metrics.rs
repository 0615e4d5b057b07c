//! HTTP request metrics exported in Prometheus text format.

use anyhow::Result;
use axum::{extract::{Request, State}, http::StatusCode, middleware::Next, response::{IntoResponse, Response}};
use once_cell::sync::{Lazy, OnceCell};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Instant;

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static HTTP_METRICS: OnceCell<HttpMetrics> = OnceCell::new();

#[derive(Clone, Debug)]
pub struct HttpMetrics {
    pub requests_total: IntCounterVec,
    pub duration_ms: HistogramVec,
}

impl HttpMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests handled, by service, method and status"),
            &["service", "method", "status"],
        )?;
        let duration_ms = HistogramVec::new(
            HistogramOpts::new("http_request_duration_ms", "HTTP request latency (ms)")
                .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0]),
            &["service", "method"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(duration_ms.clone()))?;
        Ok(Self { requests_total, duration_ms })
    }

    pub fn observe(&self, service: &str, method: &str, status: u16, elapsed_ms: f64) {
        let status = status.to_string();
        self.requests_total.with_label_values(&[service, method, status.as_str()]).inc();
        self.duration_ms.with_label_values(&[service, method]).observe(elapsed_ms);
    }
}

/// Register the process-wide HTTP metrics. Idempotent.
pub fn init_metrics() -> Result<()> {
    HTTP_METRICS.get_or_try_init(|| HttpMetrics::new(&REGISTRY))?;
    Ok(())
}

/// Middleware recording one sample per request; a no-op until
/// [`init_metrics`] has run. Mount with
/// `middleware::from_fn_with_state(SERVICE, track_requests)`.
pub async fn track_requests(State(service): State<&'static str>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let started = Instant::now();
    let resp = next.run(req).await;
    if let Some(m) = HTTP_METRICS.get() {
        m.observe(service, &method, resp.status().as_u16(), started.elapsed().as_secs_f64() * 1000.0);
    }
    resp
}

pub async fn metrics_handler() -> Response {
    if HTTP_METRICS.get().is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "metrics not initialized").into_response();
    }
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("encode error: {e}")).into_response();
    }
    ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], buf).into_response()
}
