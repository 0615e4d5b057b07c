use anyhow::Result;
use tracing::info;
use cloudlab_core::{init_metrics, init_tracing, serve, shutdown_tracer};
use users_api::{router, AppState, PgUserStore, Settings, SERVICE};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(SERVICE)?;
    init_metrics()?;
    let settings = Settings::load()?;
    info!(target: "users-api", db_host=%settings.db_host, db_name=%settings.db_name, db_port=settings.db_port, "Starting users-api service");
    let app = router(AppState::new(PgUserStore::new(settings.connect_options())));
    serve(app, settings.bind_addr.parse()?).await?;
    info!("shutdown");
    shutdown_tracer();
    Ok(())
}
