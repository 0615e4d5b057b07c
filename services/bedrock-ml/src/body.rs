//! JSON bodies for `InvokeModel`, per model family.

use serde::{Deserialize, Serialize};
use crate::catalog::ModelFamily;

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Serialize)]
pub struct ClaudeRequest<'a> {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ClaudeMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ClaudeRequest<'a> {
    pub fn user(prompt: &'a str, max_tokens: u32) -> Self {
        Self { anthropic_version: ANTHROPIC_VERSION, max_tokens, messages: vec![ClaudeMessage { role: "user", content: prompt }] }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest<'a> {
    pub input_text: &'a str,
    pub text_generation_config: TitanConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanConfig {
    pub max_token_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl<'a> TitanRequest<'a> {
    /// Low-temperature generation config used by the wrapper.
    pub fn focused(prompt: &'a str, max_tokens: u32) -> Self {
        Self {
            input_text: prompt,
            text_generation_config: TitanConfig { max_token_count: max_tokens, temperature: Some(0.3), top_p: Some(0.9), stop_sequences: Some(Vec::new()) },
        }
    }

    pub fn bare(prompt: &'a str, max_tokens: u32) -> Self {
        Self { input_text: prompt, text_generation_config: TitanConfig { max_token_count: max_tokens, temperature: None, top_p: None, stop_sequences: None } }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens: u32,
}

/// Smallest request each family accepts; used to probe model access.
pub fn probe_body(model_id: &str) -> serde_json::Result<Vec<u8>> {
    const PROBE_PROMPT: &str = "Hi";
    const PROBE_TOKENS: u32 = 10;
    match ModelFamily::of(model_id) {
        ModelFamily::Claude => serde_json::to_vec(&ClaudeRequest::user(PROBE_PROMPT, PROBE_TOKENS)),
        ModelFamily::Titan => serde_json::to_vec(&TitanRequest::bare(PROBE_PROMPT, PROBE_TOKENS)),
        ModelFamily::Other => serde_json::to_vec(&GenericRequest { prompt: PROBE_PROMPT, max_tokens: PROBE_TOKENS }),
    }
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse { content: Vec<ClaudeContent> }

#[derive(Debug, Deserialize)]
struct ClaudeContent { text: Option<String> }

#[derive(Debug, Deserialize)]
struct TitanResponse { results: Vec<TitanResult> }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult { output_text: String }

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response carried no {0}")]
    Empty(&'static str),
}

/// `content[0].text` of a messages-API response.
pub fn claude_text(body: &[u8]) -> Result<String, ResponseError> {
    let resp: ClaudeResponse = serde_json::from_slice(body)?;
    resp.content.into_iter().next().and_then(|c| c.text).ok_or(ResponseError::Empty("content[0].text"))
}

/// `results[0].outputText`, trimmed.
pub fn titan_text(body: &[u8]) -> Result<String, ResponseError> {
    let resp: TitanResponse = serde_json::from_slice(body)?;
    resp.results.into_iter().next().map(|r| r.output_text.trim().to_string()).ok_or(ResponseError::Empty("results[0].outputText"))
}
