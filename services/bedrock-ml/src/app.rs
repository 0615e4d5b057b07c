//! Text-analysis operations over Claude, with a Titan fallback for accounts
//! that have not been granted Claude access yet.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::body::{claude_text, titan_text, ClaudeRequest, ResponseError, TitanRequest};
use crate::catalog::{model_id, ModelFamily, CLAUDE_SONNET, TITAN_TEXT_EXPRESS};
use crate::invoker::{InvokeError, ModelInvoker};

pub const CLAUDE_MAX_TOKENS: u32 = 1000;
pub const TITAN_MAX_TOKENS: u32 = 512;

pub const TITAN_APOLOGY: &str = "I apologize, but I'm having trouble processing this request with the current model. Please try a simpler prompt or wait for Claude access to be approved.";

const REFUSAL_PHRASES: &[&str] = &[
    "unable to provide opinions",
    "cannot provide moral judgements",
    "i can't help with that",
    "i'm not able to",
];

#[derive(Debug, Error)]
pub enum MlError {
    #[error("error invoking {model}: {source}")]
    Invoke { model: &'static str, #[source] source: InvokeError },
    #[error("unexpected response from {model}: {source}")]
    Response { model: &'static str, #[source] source: ResponseError },
    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{role} model {nickname:?} is not a known {family:?} model")]
    UnknownModel { role: &'static str, nickname: String, family: ModelFamily },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisKind { #[default] Sentiment, Classification, Summarization, EntityExtraction }

impl AnalysisKind {
    /// Unknown names fall back to sentiment.
    pub fn parse(name: &str) -> Self {
        match name {
            "classification" => Self::Classification,
            "summarization" => Self::Summarization,
            "entity_extraction" => Self::EntityExtraction,
            _ => Self::Sentiment,
        }
    }

    fn prompt(self, text: &str) -> String {
        match self {
            Self::Sentiment => format!("Analyze the sentiment of this text and provide a detailed analysis: {text}"),
            Self::Classification => format!("Classify this text into categories and explain your reasoning: {text}"),
            Self::Summarization => format!("Provide a concise summary of this text: {text}"),
            Self::EntityExtraction => format!("Extract all named entities from this text and categorize them: {text}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind { #[default] General, Creative, Technical }

impl ContentKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "creative" => Self::Creative,
            "technical" => Self::Technical,
            _ => Self::General,
        }
    }
}

/// Keep only what follows the first `": "`, or the whole prompt without one.
fn tail_after_colon(prompt: &str) -> &str {
    prompt.find(": ").map(|i| &prompt[i + 2..]).unwrap_or(prompt)
}

/// Rewrite analysis prompts into the plainer phrasing Titan answers without
/// tripping its content filters. Anything unrecognised passes through.
pub fn simplify_prompt_for_titan(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    let text = tail_after_colon(prompt);
    if lower.contains("sentiment") {
        format!("Analyze the sentiment of this text as positive, negative, or neutral: {text}")
    } else if lower.contains("classify") {
        format!("Categorize this text: {text}")
    } else if lower.contains("summarize") || lower.contains("summary") {
        format!("Summarize this text: {text}")
    } else if lower.contains("extract") && lower.contains("entities") {
        format!("Find the important names, places, and organizations in this text: {text}")
    } else {
        prompt.to_string()
    }
}

fn is_refusal(output: &str) -> bool {
    let lower = output.to_lowercase();
    REFUSAL_PHRASES.iter().any(|p| lower.contains(p))
}

pub struct MlApp<I> {
    invoker: I,
    primary: &'static str,
    fallback: &'static str,
}

fn resolve(role: &'static str, nickname: &str, family: ModelFamily) -> Result<&'static str, MlError> {
    model_id(nickname)
        .filter(|id| ModelFamily::of(id) == family)
        .ok_or_else(|| MlError::UnknownModel { role, nickname: nickname.to_string(), family })
}

impl<I: ModelInvoker> MlApp<I> {
    /// Claude Sonnet as primary, Titan Text Express as fallback.
    pub fn new(invoker: I) -> Self { Self { invoker, primary: CLAUDE_SONNET, fallback: TITAN_TEXT_EXPRESS } }

    /// Pick both models by catalog nickname. The primary must speak the
    /// Claude request shape and the fallback the Titan one.
    pub fn with_models(invoker: I, primary: &str, fallback: &str) -> Result<Self, MlError> {
        Ok(Self {
            invoker,
            primary: resolve("primary", primary, ModelFamily::Claude)?,
            fallback: resolve("fallback", fallback, ModelFamily::Titan)?,
        })
    }

    pub fn models(&self) -> (&'static str, &'static str) { (self.primary, self.fallback) }

    pub fn invoker(&self) -> &I { &self.invoker }

    pub async fn analyze_text(&self, text: &str, kind: AnalysisKind) -> Result<String, MlError> {
        self.invoke_claude(&kind.prompt(text), CLAUDE_MAX_TOKENS).await
    }

    pub async fn generate_content(&self, prompt: &str, kind: ContentKind) -> Result<String, MlError> {
        match kind {
            ContentKind::Creative => self.invoke_titan(&format!("Create creative content: {prompt}"), TITAN_MAX_TOKENS).await,
            ContentKind::Technical => self.invoke_claude(&format!("Provide technical analysis: {prompt}"), CLAUDE_MAX_TOKENS).await,
            ContentKind::General => self.invoke_claude(prompt, CLAUDE_MAX_TOKENS).await,
        }
    }

    pub async fn data_insights(&self, description: &str) -> Result<String, MlError> {
        let prompt = format!(
            "As a data scientist, analyze this data description and provide:\n\
             1. Key insights and patterns\n\
             2. Potential ML applications\n\
             3. Recommended analysis approaches\n\
             4. Data quality considerations\n\
             \n\
             Data description: {description}"
        );
        self.invoke_claude(&prompt, CLAUDE_MAX_TOKENS).await
    }

    pub async fn code_analysis(&self, code: &str, language: &str) -> Result<String, MlError> {
        let prompt = format!(
            "Analyze this {language} code and provide:\n\
             1. Code quality assessment\n\
             2. Potential bugs or issues\n\
             3. Performance improvements\n\
             4. Best practice recommendations\n\
             \n\
             Code:\n{code}"
        );
        self.invoke_claude(&prompt, CLAUDE_MAX_TOKENS).await
    }

    /// Claude first. A missing model or unsubmitted use-case form moves the
    /// request to Titan once, with a simplified prompt; other errors return.
    #[instrument(skip(self, prompt), fields(model = self.primary, prompt_len = prompt.len()))]
    pub async fn invoke_claude(&self, prompt: &str, max_tokens: u32) -> Result<String, MlError> {
        let body = serde_json::to_vec(&ClaudeRequest::user(prompt, max_tokens))?;
        match self.invoker.invoke(self.primary, body).await {
            Ok(resp) => claude_text(&resp).map_err(|source| MlError::Response { model: self.primary, source }),
            Err(e) if e.is_resource_not_found() || e.needs_use_case_details() => {
                warn!(error=%e, "Claude access not available, using Titan as fallback");
                self.invoke_titan(&simplify_prompt_for_titan(prompt), max_tokens).await
            }
            Err(source) => Err(MlError::Invoke { model: self.primary, source }),
        }
    }

    /// Titan output containing a known refusal phrase is replaced with
    /// [`TITAN_APOLOGY`].
    #[instrument(skip(self, prompt), fields(model = self.fallback, prompt_len = prompt.len()))]
    pub async fn invoke_titan(&self, prompt: &str, max_tokens: u32) -> Result<String, MlError> {
        let body = serde_json::to_vec(&TitanRequest::focused(prompt, max_tokens))?;
        let resp = self.invoker.invoke(self.fallback, body).await
            .map_err(|source| MlError::Invoke { model: self.fallback, source })?;
        let text = titan_text(&resp).map_err(|source| MlError::Response { model: self.fallback, source })?;
        if is_refusal(&text) {
            info!("Titan declined the prompt");
            return Ok(TITAN_APOLOGY.to_string());
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::InvokeError;

    struct Unused;

    #[async_trait::async_trait]
    impl ModelInvoker for Unused {
        async fn invoke(&self, _: &str, _: Vec<u8>) -> Result<Vec<u8>, InvokeError> { Err(InvokeError::transport("unused")) }
    }

    #[test]
    fn nicknames_pick_models_by_family() {
        let app = MlApp::with_models(Unused, "claude", "titan").unwrap();
        assert_eq!(app.models(), MlApp::new(Unused).models());
        assert!(matches!(
            MlApp::with_models(Unused, "jurassic", "titan"),
            Err(MlError::UnknownModel { role: "primary", family: ModelFamily::Claude, .. })
        ));
        assert!(matches!(
            MlApp::with_models(Unused, "claude", "claude"),
            Err(MlError::UnknownModel { role: "fallback", family: ModelFamily::Titan, .. })
        ));
        let err = MlApp::with_models(Unused, "gpt", "titan").err().unwrap();
        assert_eq!(err.to_string(), "primary model \"gpt\" is not a known Claude model");
    }

    #[test]
    fn analysis_kind_falls_back_to_sentiment() {
        assert_eq!(AnalysisKind::parse("summarization"), AnalysisKind::Summarization);
        assert_eq!(AnalysisKind::parse("entity_extraction"), AnalysisKind::EntityExtraction);
        assert_eq!(AnalysisKind::parse("vibes"), AnalysisKind::Sentiment);
        assert_eq!(ContentKind::parse("creative"), ContentKind::Creative);
        assert_eq!(ContentKind::parse("poem"), ContentKind::General);
    }

    #[test]
    fn simplifies_each_analysis_prompt() {
        let text = "Rust 1.80 shipped in Berlin: great news";
        assert_eq!(
            simplify_prompt_for_titan(&AnalysisKind::Sentiment.prompt(text)),
            format!("Analyze the sentiment of this text as positive, negative, or neutral: {text}")
        );
        assert_eq!(simplify_prompt_for_titan(&AnalysisKind::Classification.prompt(text)), format!("Categorize this text: {text}"));
        assert_eq!(simplify_prompt_for_titan(&AnalysisKind::Summarization.prompt(text)), format!("Summarize this text: {text}"));
        assert_eq!(
            simplify_prompt_for_titan(&AnalysisKind::EntityExtraction.prompt(text)),
            format!("Find the important names, places, and organizations in this text: {text}")
        );
    }

    #[test]
    fn simplify_without_colon_keeps_whole_prompt() {
        assert_eq!(simplify_prompt_for_titan("summarize everything"), "Summarize this text: summarize everything");
        assert_eq!(simplify_prompt_for_titan("write a haiku"), "write a haiku");
    }

    #[test]
    fn refusals_match_case_insensitively() {
        assert!(is_refusal("Sorry, I'm not able to do that."));
        assert!(is_refusal("I am UNABLE TO PROVIDE OPINIONS on this."));
        assert!(!is_refusal("The sentiment is positive."));
    }
}
