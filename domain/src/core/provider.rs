//! Provider value object identifying an LLM provider slot

use serde::{Deserialize, Serialize};

/// One of the canonical LLM providers (Value Object)
///
/// A `ProviderId` names a provider *slot*, not a model version. Which model
/// answers for a slot is deployment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderId {
    /// All providers, in canonical order
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Gemini];

    /// Get the wire identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
        }
    }

    /// Human-readable name used in prompts and console output
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Anthropic => "Anthropic",
            ProviderId::Gemini => "Gemini",
        }
    }

    /// Get the default set of providers queried for every question
    pub fn default_providers() -> Vec<ProviderId> {
        Self::ALL.to_vec()
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAi),
            "anthropic" | "claude" => Ok(ProviderId::Anthropic),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            other => Err(crate::core::error::DomainError::UnknownProvider(
                other.to_string(),
            )),
        }
    }
}
