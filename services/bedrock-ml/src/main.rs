use anyhow::Result;
use clap::Parser;
use bedrock_ml::{cli::{run_task, Cli}, invoker::sdk_config, BedrockInvoker, MlApp, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    cloudlab_core::init_logging();
    let cli = Cli::parse();
    let Some(input) = cli.input()? else {
        println!("Please provide either --text or --file");
        return Ok(());
    };
    let settings = Settings::load("bedrock-ml")?;
    let region = cli.region.clone().unwrap_or(settings.region);
    let invoker = BedrockInvoker::new(&sdk_config(&region).await);
    let app = MlApp::with_models(invoker, &settings.primary_model, &settings.fallback_model)?;
    let (primary, fallback) = app.models();
    tracing::info!(target: "bedrock-ml", %region, primary, fallback, task=?cli.task, "running task");

    match run_task(&app, cli.task, &input, cli.kind.as_deref()).await {
        Ok(result) => {
            println!("Result:");
            println!("{}", "=".repeat(50));
            println!("{result}");
        }
        Err(e) => {
            tracing::error!(error=%e, "task failed");
            println!("Failed to get result from Bedrock: {e}");
        }
    }
    Ok(())
}
