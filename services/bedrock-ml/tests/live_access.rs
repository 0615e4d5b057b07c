//! Runs the access probes against the real service. Needs AWS credentials in
//! the environment; without them the test returns early.
#![cfg(feature = "integration")]

use bedrock_ml::access::{check_model_access, list_available_models, render_report, AccessStatus};
use bedrock_ml::catalog::PROBE_MODELS;
use bedrock_ml::invoker::sdk_config;
use bedrock_ml::{BedrockInvoker, BedrockLister, Settings};

fn credentials_configured() -> bool {
    ["AWS_ACCESS_KEY_ID", "AWS_PROFILE", "AWS_WEB_IDENTITY_TOKEN_FILE", "AWS_CONTAINER_CREDENTIALS_FULL_URI"]
        .iter()
        .any(|v| std::env::var(v).is_ok())
}

#[tokio::test]
async fn probes_every_catalog_model() {
    if !credentials_configured() {
        eprintln!("no AWS credentials configured, skipping");
        return;
    }
    let region = Settings::load("bedrock-access").unwrap().region;
    let config = sdk_config(&region).await;
    let probes = check_model_access(&BedrockInvoker::new(&config), PROBE_MODELS).await;
    assert_eq!(probes.len(), PROBE_MODELS.len());
    for (probe, (name, id)) in probes.iter().zip(PROBE_MODELS) {
        assert_eq!(probe.name, *name);
        assert_eq!(probe.model_id, *id);
        // a reachable endpoint always answers with a service error code
        assert!(!matches!(probe.status, AccessStatus::Unexpected(_)), "{name}: {:?}", probe.status);
    }
    let models = list_available_models(&BedrockLister::new(&config)).await;
    eprintln!("{}", render_report(&region, &probes, &models));
}
