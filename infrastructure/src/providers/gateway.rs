//! HTTP gateway routing sessions to provider adapters

use super::{
    AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter, ProviderSettings,
};
use async_trait::async_trait;
use consensus_application::{GatewayError, LlmGateway, LlmSession};
use consensus_domain::ProviderId;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Public description of a configured provider slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub provider: ProviderId,
    pub model: String,
    /// Whether requests without a key for this provider can still call it
    pub has_default_key: bool,
}

/// [`LlmGateway`] over real provider HTTP APIs.
///
/// Holds one pooled `reqwest::Client` shared by every adapter. Secrets are
/// never stored here except the deployment defaults loaded at startup.
pub struct HttpLlmGateway {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl HttpLlmGateway {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Build the standard adapter for every `(provider, settings)` pair
    pub fn from_settings(
        settings: impl IntoIterator<Item = (ProviderId, ProviderSettings)>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(concat!("llm-consensus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to create HTTP client: {e}")))?;

        let adapters = settings
            .into_iter()
            .map(|(provider, settings)| -> Arc<dyn ProviderAdapter> {
                match provider {
                    ProviderId::OpenAi => Arc::new(OpenAiAdapter::new(client.clone(), settings)),
                    ProviderId::Anthropic => {
                        Arc::new(AnthropicAdapter::new(client.clone(), settings))
                    }
                    ProviderId::Gemini => Arc::new(GeminiAdapter::new(client.clone(), settings)),
                }
            })
            .collect();

        Ok(Self::new(adapters))
    }

    fn adapter(&self, provider: ProviderId) -> Option<&dyn ProviderAdapter> {
        self.adapters
            .iter()
            .find(|a| a.provider() == provider)
            .map(|a| a.as_ref())
    }

    /// Describe every configured provider, in the order given
    pub fn describe(&self, providers: &[ProviderId]) -> Vec<ProviderDescriptor> {
        providers
            .iter()
            .filter_map(|&p| self.adapter(p))
            .map(|a| ProviderDescriptor {
                provider: a.provider(),
                model: a.settings().model.clone(),
                has_default_key: a.settings().api_key.is_some(),
            })
            .collect()
    }
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn create_session(
        &self,
        provider: ProviderId,
        credential: Option<&str>,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let adapter = self
            .adapter(provider)
            .ok_or_else(|| GatewayError::Other(format!("provider {provider} is not configured")))?;

        let api_key = credential
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(adapter.settings().api_key.as_deref())
            .ok_or(GatewayError::MissingCredential(provider))?;

        debug!(
            "Creating {} session (model={}, key source={})",
            provider,
            adapter.settings().model,
            if credential.is_some_and(|k| !k.trim().is_empty()) {
                "request"
            } else {
                "default"
            }
        );
        adapter
            .create_session(api_key.to_string(), system_prompt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn gateway(base_url: &str, default_key: Option<&str>) -> HttpLlmGateway {
        let mut settings = ProviderSettings::new("gpt-4o", base_url);
        if let Some(key) = default_key {
            settings = settings.with_api_key(key);
        }
        HttpLlmGateway::from_settings([
            (ProviderId::OpenAi, settings),
            (
                ProviderId::Gemini,
                ProviderSettings::new("gemini-2.5-flash", base_url),
            ),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let gw = gateway("http://127.0.0.1:1", None);

        let err = gw
            .create_session(ProviderId::Gemini, None, "system")
            .await
            .err()
            .unwrap();

        assert!(matches!(err, GatewayError::MissingCredential(ProviderId::Gemini)));
        assert_eq!(err.to_string(), "No API key configured for gemini");
    }

    #[tokio::test]
    async fn test_blank_request_key_is_treated_as_absent() {
        let gw = gateway("http://127.0.0.1:1", None);
        let err = gw
            .create_session(ProviderId::OpenAi, Some("   "), "system")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, GatewayError::MissingCredential(ProviderId::OpenAi)));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_an_error() {
        let gw = gateway("http://127.0.0.1:1", Some("sk-default"));
        assert!(
            gw.create_session(ProviderId::Anthropic, Some("key"), "system")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_request_key_overrides_deployment_default() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-request")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let gw = gateway(&server.url(), Some("sk-default"));
        let session = gw
            .create_session(ProviderId::OpenAi, Some("sk-request"), "system")
            .await
            .unwrap();

        assert_eq!(session.send("hi").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_deployment_default_is_used_without_request_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-default")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let gw = gateway(&server.url(), Some("sk-default"));
        let session = gw
            .create_session(ProviderId::OpenAi, None, "system")
            .await
            .unwrap();

        assert_eq!(session.send("hi").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[test]
    fn test_describe_reports_models_and_key_presence_only() {
        let gw = gateway("http://localhost", Some("sk-default"));
        let described = gw.describe(&[ProviderId::Gemini, ProviderId::OpenAi]);

        assert_eq!(
            described,
            vec![
                ProviderDescriptor {
                    provider: ProviderId::Gemini,
                    model: "gemini-2.5-flash".to_string(),
                    has_default_key: false,
                },
                ProviderDescriptor {
                    provider: ProviderId::OpenAi,
                    model: "gpt-4o".to_string(),
                    has_default_key: true,
                },
            ]
        );
    }
}
