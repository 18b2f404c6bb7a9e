//! OpenAI Chat Completions adapter

use super::response_parsing::{ErrorClass, ErrorEnvelope, map_transport_error};
use super::wire_schema::openai_strict;
use super::{ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use consensus_application::{GatewayError, LlmSession};
use consensus_domain::ProviderId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

const LABEL: &str = "OpenAI";
const SCHEMA_NAME: &str = "consensus_verdict";

pub struct OpenAiAdapter {
    client: Client,
    settings: Arc<ProviderSettings>,
}

impl OpenAiAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn create_session(
        &self,
        api_key: String,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            api_key,
            system_prompt: system_prompt.to_string(),
        }))
    }
}

pub struct OpenAiSession {
    client: Client,
    settings: Arc<ProviderSettings>,
    api_key: String,
    system_prompt: String,
}

impl OpenAiSession {
    fn build_request(&self, content: &str, response_format: Option<Value>) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            max_completion_tokens: self.settings.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: content.to_string(),
                },
            ],
            response_format,
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        debug!("OpenAI request: model={}", request.model);

        let response = self
            .client
            .post(self.settings.endpoint("/v1/chat/completions"))
            .timeout(self.settings.timeout)
            .bearer_auth(&self.api_key)
            .json(request)
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

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("OpenAI response decode failed: {e}"))
        })?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| GatewayError::InvalidResponse("OpenAI returned no choices".into()))?;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(GatewayError::InvalidResponse(format!(
                "OpenAI model refused: {refusal}"
            )));
        }

        message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GatewayError::InvalidResponse("OpenAI returned empty content".into()))
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let request = self.build_request(content, None);
        self.complete(&request).await
    }

    async fn send_structured(&self, content: &str, schema: &Value) -> Result<String, GatewayError> {
        let response_format = json!({
            "type": "json_schema",
            "json_schema": {
                "name": SCHEMA_NAME,
                "strict": true,
                "schema": openai_strict(schema),
            }
        });
        let request = self.build_request(content, Some(response_format));
        self.complete(&request).await
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let envelope = ErrorEnvelope::parse(body);
    let detail = envelope.detail();

    let class = if matches!(detail.code(), Some("invalid_api_key" | "invalid_authentication"))
        || matches!(detail.error_type(), Some("authentication_error"))
    {
        ErrorClass::Auth
    } else if matches!(
        detail.code(),
        Some("rate_limit_exceeded" | "insufficient_quota")
    ) {
        ErrorClass::RateLimited
    } else {
        ErrorClass::from_status(status)
    };

    class.into_error(LABEL, status, detail.message_or(body))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_completion_tokens: u32,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
