//! Model identifiers used by the wrapper and the access checker.

pub const CLAUDE_SONNET: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const CLAUDE_HAIKU: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const TITAN_TEXT_EXPRESS: &str = "amazon.titan-text-express-v1";
pub const JURASSIC_ULTRA: &str = "ai21.j2-ultra-v1";

/// Nickname -> model id.
pub const MODELS: &[(&str, &str)] = &[
    ("claude", CLAUDE_SONNET),
    ("titan", TITAN_TEXT_EXPRESS),
    ("jurassic", JURASSIC_ULTRA),
];

/// Display name -> model id, in the order the access checker reports them.
pub const PROBE_MODELS: &[(&str, &str)] = &[
    ("Claude 3 Sonnet", CLAUDE_SONNET),
    ("Claude 3 Haiku", CLAUDE_HAIKU),
    ("Titan Text Express", TITAN_TEXT_EXPRESS),
    ("AI21 Jurassic", JURASSIC_ULTRA),
];

pub fn model_id(nickname: &str) -> Option<&'static str> {
    MODELS.iter().find(|(n, _)| *n == nickname).map(|(_, id)| *id)
}

/// Request/response shape a model expects, picked from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily { Claude, Titan, Other }

impl ModelFamily {
    pub fn of(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if id.contains("claude") { Self::Claude } else if id.contains("titan") { Self::Titan } else { Self::Other }
    }
}
