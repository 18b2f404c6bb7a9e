//! Google Gemini generateContent adapter

use super::response_parsing::{ErrorClass, ErrorEnvelope, map_transport_error};
use super::wire_schema::gemini_response_schema;
use super::{ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use consensus_application::{GatewayError, LlmSession};
use consensus_domain::ProviderId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const LABEL: &str = "Gemini";

pub struct GeminiAdapter {
    client: Client,
    settings: Arc<ProviderSettings>,
}

impl GeminiAdapter {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn create_session(
        &self,
        api_key: String,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            api_key,
            system_prompt: system_prompt.to_string(),
        }))
    }
}

pub struct GeminiSession {
    client: Client,
    settings: Arc<ProviderSettings>,
    api_key: String,
    system_prompt: String,
}

impl GeminiSession {
    fn build_request(&self, content: &str, response_schema: Option<Value>) -> GenerateRequest {
        let structured = response_schema.is_some();
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: self.system_prompt.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: content.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.max_tokens,
                response_mime_type: structured.then(|| "application/json".to_string()),
                response_schema,
            },
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, GatewayError> {
        let path = format!("/v1beta/models/{}:generateContent", self.settings.model);
        debug!("Gemini request: model={}", self.settings.model);

        let response = self
            .client
            .post(self.settings.endpoint(&path))
            .timeout(self.settings.timeout)
            .header("x-goog-api-key", &self.api_key)
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

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("Gemini response decode failed: {e}"))
        })?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(GatewayError::InvalidResponse(format!(
                "Gemini returned no answer: {reason}"
            )));
        };

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "empty content".to_string());
            return Err(GatewayError::InvalidResponse(format!(
                "Gemini returned no text: {reason}"
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let request = self.build_request(content, None);
        self.generate(&request).await
    }

    async fn send_structured(&self, content: &str, schema: &Value) -> Result<String, GatewayError> {
        let request = self.build_request(content, Some(gemini_response_schema(schema)));
        self.generate(&request).await
    }
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let envelope = ErrorEnvelope::parse(body);
    let detail = envelope.detail();
    let message = detail.message_or(body);

    // A bad key comes back as 400 INVALID_ARGUMENT
    let class = match detail.status() {
        Some("UNAUTHENTICATED" | "PERMISSION_DENIED") => ErrorClass::Auth,
        Some("INVALID_ARGUMENT") if message.contains("API key") => ErrorClass::Auth,
        Some("RESOURCE_EXHAUSTED") => ErrorClass::RateLimited,
        Some("DEADLINE_EXCEEDED") => ErrorClass::Timeout,
        _ => ErrorClass::from_status(status),
    };

    class.into_error(LABEL, status, message)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
