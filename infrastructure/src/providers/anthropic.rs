//! Anthropic Messages API adapter
//!
//! The Messages API has no schema-constrained decoding, so structured calls
//! use the session default: the schema goes into the instruction and the
//! validator extracts the object from the text.

use super::response_parsing::{ErrorClass, ErrorEnvelope, map_transport_error};
use super::{ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use consensus_application::{GatewayError, LlmSession};
use consensus_domain::ProviderId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const LABEL: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: Client,
    settings: Arc<ProviderSettings>,
}

impl AnthropicAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn create_session(
        &self,
        api_key: String,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(AnthropicSession {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            api_key,
            system_prompt: system_prompt.to_string(),
        }))
    }
}

pub struct AnthropicSession {
    client: Client,
    settings: Arc<ProviderSettings>,
    api_key: String,
    system_prompt: String,
}

#[async_trait]
impl LlmSession for AnthropicSession {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let payload = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            system: &self.system_prompt,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };
        debug!("Anthropic request: model={}", payload.model);

        let response = self
            .client
            .post(self.settings.endpoint("/v1/messages"))
            .timeout(self.settings.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error(LABEL, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(LABEL, e))?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("Anthropic response decode failed: {e}"))
        })?;

        let joined_text = parsed
            .content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("");
        if joined_text.trim().is_empty() {
            return Err(GatewayError::InvalidResponse(
                "Anthropic response did not include a text content block".into(),
            ));
        }

        Ok(joined_text)
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let envelope = ErrorEnvelope::parse(body);
    let detail = envelope.detail();

    let class = match detail.error_type() {
        Some("authentication_error" | "permission_error") => ErrorClass::Auth,
        Some("rate_limit_error") => ErrorClass::RateLimited,
        Some("timeout_error") => ErrorClass::Timeout,
        _ => ErrorClass::from_status(status),
    };

    class.into_error(LABEL, status, detail.message_or(body))
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl ContentBlock {
    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}
