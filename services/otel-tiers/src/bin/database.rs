use anyhow::Result;
use tracing::info;
use cloudlab_core::{init_metrics, init_tracing, serve, shutdown_tracer};
use otel_tiers::{database_router, TierSettings, DATABASE};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(DATABASE)?;
    init_metrics()?;
    let settings = TierSettings::load(DATABASE, "0.0.0.0:5002", None)?;
    info!(target: "database", "Starting database tier");
    serve(database_router(), settings.bind_addr.parse()?).await?;
    shutdown_tracer();
    Ok(())
}
