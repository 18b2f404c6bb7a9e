//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use consensus_domain::ProviderId;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No API key configured for {0}")]
    MissingCredential(ProviderId),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
///
/// Sessions are cheap and request-scoped: every request builds its own from
/// its own credentials, so nothing secret outlives the request.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a session for `provider` with a system instruction.
    ///
    /// `credential` is the caller's secret; `None` means the adapter must use
    /// the deployment default, failing with
    /// [`GatewayError::MissingCredential`] when there is none.
    async fn create_session(
        &self,
        provider: ProviderId,
        credential: Option<&str>,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the provider behind this session
    fn provider(&self) -> ProviderId;

    /// Send a message and get the text response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Send a message whose response must be a JSON object matching `schema`.
    ///
    /// Returns the raw response text; validation is the caller's job.
    /// Default implementation embeds the schema in the message, so providers
    /// without native structured output still work.
    async fn send_structured(
        &self,
        content: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GatewayError> {
        let schema = serde_json::to_string_pretty(schema)
            .map_err(|e| GatewayError::Other(format!("failed to serialize schema: {}", e)))?;
        let message = format!(
            "{}\n\nReturn only a JSON object that matches the schema below.\nDo not include markdown fences.\nSchema:\n{}",
            content, schema
        );
        self.send(&message).await
    }
}
