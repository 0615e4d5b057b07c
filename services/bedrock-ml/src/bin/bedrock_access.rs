use anyhow::Result;
use clap::Parser;
use bedrock_ml::{access::{check_model_access, list_available_models, render_report}, catalog::PROBE_MODELS, invoker::sdk_config, BedrockInvoker, BedrockLister, Settings};

/// Check AWS Bedrock model access and availability
#[derive(Debug, Parser)]
#[command(name = "bedrock-access")]
struct Args {
    /// AWS region; overrides BEDROCK_REGION
    #[arg(long)]
    region: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    cloudlab_core::init_logging();
    let args = Args::parse();
    let region = match args.region { Some(r) => r, None => Settings::load("bedrock-access")?.region };
    println!("🤖 AWS Bedrock Access Checker");
    println!("{}", "=".repeat(40));

    let config = sdk_config(&region).await;
    let probes = check_model_access(&BedrockInvoker::new(&config), PROBE_MODELS).await;
    let models = list_available_models(&BedrockLister::new(&config)).await;
    print!("{}", render_report(&region, &probes, &models));
    Ok(())
}
