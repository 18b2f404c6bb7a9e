//! Provider configuration from TOML (`[providers]` section)
//!
//! ```toml
//! [providers.openai]
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [providers.gemini]
//! model = "gemini-2.5-pro"
//! timeout_seconds = 90
//! ```

use super::ConfigValidationError;
use crate::providers::ProviderSettings;
use consensus_domain::ProviderId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fields every provider section shares
pub trait FileProviderSection {
    fn model(&self) -> &str;
    fn base_url(&self) -> &str;
    fn api_key_env(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn max_tokens(&self) -> u32;
    fn timeout_seconds(&self) -> u64;

    /// Deployment default key: `api_key` first, then the `api_key_env` variable
    fn resolve_api_key(&self) -> Option<String> {
        self.api_key()
            .map(str::to_string)
            .or_else(|| std::env::var(self.api_key_env()).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    fn to_settings(&self) -> ProviderSettings {
        let settings = ProviderSettings::new(self.model(), self.base_url())
            .with_max_tokens(self.max_tokens())
            .with_timeout(Duration::from_secs(self.timeout_seconds()));
        match self.resolve_api_key() {
            Some(key) => settings.with_api_key(key),
            None => settings,
        }
    }

    fn validate(&self, provider: ProviderId) -> Result<(), ConfigValidationError> {
        if self.model().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { provider });
        }
        if self.timeout_seconds() == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: format!("providers.{provider}.timeout_seconds"),
            });
        }
        Ok(())
    }
}

macro_rules! provider_section {
    ($ty:ty) => {
        impl FileProviderSection for $ty {
            fn model(&self) -> &str {
                &self.model
            }
            fn base_url(&self) -> &str {
                &self.base_url
            }
            fn api_key_env(&self) -> &str {
                &self.api_key_env
            }
            fn api_key(&self) -> Option<&str> {
                self.api_key.as_deref()
            }
            fn max_tokens(&self) -> u32 {
                self.max_tokens
            }
            fn timeout_seconds(&self) -> u64 {
                self.timeout_seconds
            }
        }
    };
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    pub model: String,
    /// Base URL for the OpenAI API (can be overridden for compatible gateways).
    pub base_url: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 4096,
            timeout_seconds: 45,
        }
    }
}

provider_section!(FileOpenAiConfig);

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    pub model: String,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            max_tokens: 4096,
            timeout_seconds: 45,
        }
    }
}

provider_section!(FileAnthropicConfig);

/// Google Gemini API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    pub model: String,
    /// Base URL for the Generative Language API.
    pub base_url: String,
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 4096,
            timeout_seconds: 45,
        }
    }
}

provider_section!(FileGeminiConfig);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
    pub gemini: FileGeminiConfig,
}

impl FileProvidersConfig {
    pub fn section(&self, provider: ProviderId) -> &dyn FileProviderSection {
        match provider {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Gemini => &self.gemini,
        }
    }

    /// Runtime settings for each listed provider, in order
    pub fn to_settings(&self, providers: &[ProviderId]) -> Vec<(ProviderId, ProviderSettings)> {
        providers
            .iter()
            .map(|&p| (p, self.section(p).to_settings()))
            .collect()
    }
}
