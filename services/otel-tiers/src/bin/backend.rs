use anyhow::Result;
use tracing::info;
use cloudlab_core::{init_metrics, init_tracing, serve, shutdown_tracer};
use otel_tiers::{backend_router, TierSettings, Upstream, BACKEND};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(BACKEND)?;
    init_metrics()?;
    let settings = TierSettings::load(BACKEND, "0.0.0.0:5001", Some(("DATABASE_URL", "http://database.default.svc.cluster.local:5002")))?;
    let database = Upstream::new(settings.upstream_url.clone().unwrap_or_default());
    info!(target: "backend", database=%database.base_url(), "Starting backend tier");
    serve(backend_router(database), settings.bind_addr.parse()?).await?;
    shutdown_tracer();
    Ok(())
}
