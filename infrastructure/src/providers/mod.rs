//! LLM provider adapters
//!
//! One adapter per provider slot, all sharing a pooled `reqwest::Client`.
//! [`HttpLlmGateway`] routes sessions to the adapter for the requested
//! provider and resolves credentials.

pub mod anthropic;
pub mod gateway;
pub mod gemini;
pub mod openai;
pub mod response_parsing;
pub(crate) mod wire_schema;

pub use anthropic::AnthropicAdapter;
pub use gateway::{HttpLlmGateway, ProviderDescriptor};
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use async_trait::async_trait;
use consensus_application::{GatewayError, LlmSession};
use consensus_domain::ProviderId;
use std::time::Duration;

/// Connection settings for one provider slot
#[derive(Clone)]
pub struct ProviderSettings {
    /// Model that answers for this slot
    pub model: String,
    /// API root, without the versioned path
    pub base_url: String,
    /// Deployment default key, used when a request brings none
    pub api_key: Option<String>,
    pub max_tokens: u32,
    /// Per-call HTTP timeout
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
            api_key: None,
            max_tokens: 4096,
            timeout: Duration::from_secs(45),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then(|| api_key.trim().to_string());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A provider's session factory
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    fn settings(&self) -> &ProviderSettings;

    /// Build a session authenticated with `api_key`
    async fn create_session(
        &self,
        api_key: String,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}
