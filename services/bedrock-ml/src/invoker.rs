//! The network seam: one trait for `InvokeModel`, one for listing models,
//! each with an AWS SDK implementation.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use thiserror::Error;
use tracing::instrument;

pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";
pub const ACCESS_DENIED: &str = "AccessDeniedException";
const USE_CASE_DETAILS: &str = "use case details";

/// Service error code (when the service sent one) and the full message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct InvokeError {
    pub code: Option<String>,
    pub message: String,
}

impl InvokeError {
    pub fn service(code: &str, message: impl Into<String>) -> Self { Self { code: Some(code.to_string()), message: message.into() } }
    pub fn transport(message: impl Into<String>) -> Self { Self { code: None, message: message.into() } }

    pub fn is_resource_not_found(&self) -> bool {
        self.code.as_deref() == Some(RESOURCE_NOT_FOUND) || self.message.contains(RESOURCE_NOT_FOUND)
    }

    /// Account has not filled in the model's use-case form.
    pub fn needs_use_case_details(&self) -> bool { self.message.contains(USE_CASE_DETAILS) }
}

fn sdk_error<E, R>(err: SdkError<E, R>) -> InvokeError
where E: ProvideErrorMetadata + std::error::Error + 'static, R: std::fmt::Debug {
    InvokeError { code: err.code().map(str::to_string), message: DisplayErrorContext(&err).to_string() }
}

#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send a JSON body to `model_id`, return the raw response body.
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, InvokeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait ModelLister: Send + Sync {
    async fn list_models(&self) -> Result<Vec<ModelSummary>, InvokeError>;
}

pub async fn sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

#[derive(Clone, Debug)]
pub struct BedrockInvoker {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockInvoker {
    pub fn new(config: &aws_config::SdkConfig) -> Self { Self { client: aws_sdk_bedrockruntime::Client::new(config) } }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    #[instrument(skip(self, body), fields(otel.kind = "client", body_bytes = body.len()))]
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, InvokeError> {
        let out = self.client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(out.body.into_inner())
    }
}

#[derive(Clone, Debug)]
pub struct BedrockLister {
    client: aws_sdk_bedrock::Client,
}

impl BedrockLister {
    pub fn new(config: &aws_config::SdkConfig) -> Self { Self { client: aws_sdk_bedrock::Client::new(config) } }
}

#[async_trait]
impl ModelLister for BedrockLister {
    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelSummary>, InvokeError> {
        let out = self.client.list_foundation_models().send().await.map_err(sdk_error)?;
        Ok(out.model_summaries().iter().map(|m| ModelSummary {
            id: m.model_id().to_string(),
            name: m.model_name().unwrap_or_default().to_string(),
        }).collect())
    }
}
