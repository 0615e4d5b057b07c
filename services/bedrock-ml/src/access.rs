//! Probe which models the account can call and list what the region offers.

use crate::body::probe_body;
use crate::invoker::{InvokeError, ModelInvoker, ModelLister, ModelSummary, ACCESS_DENIED, RESOURCE_NOT_FOUND};

pub const NEXT_STEPS: &str = "\
💡 Next steps:
1. If you see '⚠️ Need to request access', go to AWS Bedrock console
2. Click 'Model access' → 'Request model access'
3. Select the models you need and fill out the use case form
4. Wait for approval (usually instant)

🔗 AWS Bedrock Console: https://console.aws.amazon.com/bedrock/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessStatus {
    Granted,
    NeedsUseCaseForm,
    NotInRegion,
    Denied,
    Other(String),
    Unexpected(String),
}

impl AccessStatus {
    pub fn classify(outcome: &Result<Vec<u8>, InvokeError>) -> Self {
        let err = match outcome {
            Ok(_) => return Self::Granted,
            Err(e) => e,
        };
        match err.code.as_deref() {
            Some(RESOURCE_NOT_FOUND) if err.needs_use_case_details() => Self::NeedsUseCaseForm,
            Some(RESOURCE_NOT_FOUND) => Self::NotInRegion,
            Some(ACCESS_DENIED) => Self::Denied,
            Some(code) => Self::Other(code.to_string()),
            None => Self::Unexpected(err.message.clone()),
        }
    }

    pub fn line(&self, name: &str) -> String {
        match self {
            Self::Granted => format!("✅ {name}: Access granted"),
            Self::NeedsUseCaseForm => format!("⚠️  {name}: Need to request access (fill use case form)"),
            Self::NotInRegion => format!("❌ {name}: Model not available in this region"),
            Self::Denied => format!("🔒 {name}: Access denied (check permissions)"),
            Self::Other(code) => format!("❓ {name}: {code}"),
            Self::Unexpected(msg) => format!("❌ {name}: Unexpected error - {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub name: String,
    pub model_id: String,
    pub status: AccessStatus,
}

/// Send a ten-token request to each `(display name, model id)` in turn.
pub async fn check_model_access<I: ModelInvoker>(invoker: &I, probes: &[(&str, &str)]) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(probes.len());
    for (name, model_id) in probes {
        let outcome = match probe_body(model_id) {
            Ok(body) => invoker.invoke(model_id, body).await,
            Err(e) => Err(InvokeError::transport(e.to_string())),
        };
        let status = AccessStatus::classify(&outcome);
        tracing::debug!(model_id, ?status, "probed");
        results.push(ProbeResult { name: name.to_string(), model_id: model_id.to_string(), status });
    }
    results
}

pub async fn list_available_models<L: ModelLister>(lister: &L) -> Result<Vec<ModelSummary>, InvokeError> {
    lister.list_models().await
}

pub fn render_report(region: &str, probes: &[ProbeResult], models: &Result<Vec<ModelSummary>, InvokeError>) -> String {
    let mut lines = vec![format!("🔍 Checking Bedrock model access in {region}"), "=".repeat(50)];
    lines.extend(probes.iter().map(|p| p.status.line(&p.name)));
    match models {
        Ok(models) => {
            lines.push(format!("\n📋 Available models in {region}:"));
            lines.push("-".repeat(30));
            lines.extend(models.iter().map(|m| format!("• {} ({})", m.name, m.id)));
        }
        Err(e) => lines.push(format!("❌ Error listing models: {e}")),
    }
    lines.push(format!("\n{NEXT_STEPS}"));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_outcome() {
        assert_eq!(AccessStatus::classify(&Ok(vec![])), AccessStatus::Granted);
        let form = InvokeError::service(RESOURCE_NOT_FOUND, "Model use case details have not been submitted");
        assert_eq!(AccessStatus::classify(&Err(form)), AccessStatus::NeedsUseCaseForm);
        let region = InvokeError::service(RESOURCE_NOT_FOUND, "This model is not supported in this region");
        assert_eq!(AccessStatus::classify(&Err(region)), AccessStatus::NotInRegion);
        assert_eq!(AccessStatus::classify(&Err(InvokeError::service(ACCESS_DENIED, "no"))), AccessStatus::Denied);
        assert_eq!(
            AccessStatus::classify(&Err(InvokeError::service("ThrottlingException", "slow down"))),
            AccessStatus::Other("ThrottlingException".into())
        );
        assert_eq!(
            AccessStatus::classify(&Err(InvokeError::transport("dispatch failure"))),
            AccessStatus::Unexpected("dispatch failure".into())
        );
    }

    #[test]
    fn report_lists_models_and_guidance() {
        let probes = vec![ProbeResult { name: "Titan Text Express".into(), model_id: "amazon.titan-text-express-v1".into(), status: AccessStatus::Granted }];
        let models = Ok(vec![ModelSummary { id: "amazon.titan-text-express-v1".into(), name: "Titan Text G1 - Express".into() }]);
        let report = render_report("us-east-1", &probes, &models);
        assert!(report.contains("✅ Titan Text Express: Access granted"));
        assert!(report.contains("• Titan Text G1 - Express (amazon.titan-text-express-v1)"));
        assert!(report.ends_with("https://console.aws.amazon.com/bedrock/\n"));
        let head: Vec<&str> = report.lines().take(3).collect();
        assert_eq!(head, ["🔍 Checking Bedrock model access in us-east-1", "=".repeat(50).as_str(), "✅ Titan Text Express: Access granted"]);
    }

    #[test]
    fn report_shows_listing_error() {
        let report = render_report("eu-west-1", &[], &Err(InvokeError::transport("no credentials")));
        assert!(report.contains("❌ Error listing models: no credentials"));
    }
}
