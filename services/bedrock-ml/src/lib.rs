//! Foundation-model wrapper over AWS Bedrock: text analysis, generation,
//! data insights and code review, plus an account access checker.

pub mod access;
pub mod app;
pub mod body;
pub mod catalog;
pub mod cli;
pub mod invoker;

pub use app::{AnalysisKind, ContentKind, MlApp, MlError};
pub use invoker::{BedrockInvoker, BedrockLister, InvokeError, ModelInvoker, ModelLister, ModelSummary};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub region: String,
    /// Catalog nicknames, see [`catalog::MODELS`].
    pub primary_model: String,
    pub fallback_model: String,
}

impl Settings {
    /// `BEDROCK_REGION` (`us-east-1`), `BEDROCK_PRIMARY_MODEL` (`claude`),
    /// `BEDROCK_FALLBACK_MODEL` (`titan`).
    pub fn load(service: &str) -> anyhow::Result<Self> {
        cloudlab_core::load_config(service, Some("BEDROCK"), &[
            ("region", "us-east-1"),
            ("primary_model", "claude"),
            ("fallback_model", "titan"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_resolve_through_catalog() {
        for var in ["BEDROCK_REGION", "BEDROCK_PRIMARY_MODEL", "BEDROCK_FALLBACK_MODEL"] { std::env::remove_var(var); }
        let s = Settings::load("bedrock-ml").unwrap();
        assert_eq!(s.region, "us-east-1");
        assert_eq!(catalog::model_id(&s.primary_model), Some(catalog::CLAUDE_SONNET));
        assert_eq!(catalog::model_id(&s.fallback_model), Some(catalog::TITAN_TEXT_EXPRESS));
    }
}
