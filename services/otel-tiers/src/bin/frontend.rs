use anyhow::Result;
use tracing::info;
use cloudlab_core::{init_metrics, init_tracing, serve, shutdown_tracer};
use otel_tiers::{frontend_router, TierSettings, Upstream, FRONTEND};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(FRONTEND)?;
    init_metrics()?;
    let settings = TierSettings::load(FRONTEND, "0.0.0.0:5000", Some(("BACKEND_URL", "http://backend.default.svc.cluster.local:5001")))?;
    let backend = Upstream::new(settings.upstream_url.clone().unwrap_or_default());
    info!(target: "frontend", backend=%backend.base_url(), "Starting frontend tier");
    serve(frontend_router(backend), settings.bind_addr.parse()?).await?;
    shutdown_tracer();
    Ok(())
}
