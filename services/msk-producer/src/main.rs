use anyhow::Result;
use tracing::info;
use cloudlab_core::{init_tracing, shutdown_tracer};
use msk_producer::{produce_demo, KafkaSink, Settings, SERVICE};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(SERVICE)?;
    let settings = Settings::load()?;
    info!(target: "msk-producer", brokers=?settings.brokers(), topic=%settings.topic, "Starting producer");
    let sink = KafkaSink::new(&settings)?;
    let sent = produce_demo(&sink, &settings).await;
    shutdown_tracer();
    sent?;
    Ok(())
}
