//! Shared helpers for use cases.
//!
//! Contains the single-provider call used by every fan-out strategy.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use consensus_domain::{ProviderId, ProviderOutcome};
use tracing::{debug, warn};

/// Ask one provider one question and fold the result into a [`ProviderOutcome`].
///
/// Never fails: transport, auth and decoding problems all become
/// [`ProviderOutcome::Error`] so a single provider can never abort the round.
/// An empty prompt or an empty answer is reported the same way.
pub async fn generate<G: LlmGateway + ?Sized>(
    gateway: &G,
    provider: ProviderId,
    prompt: &str,
    system_instruction: &str,
    credential: Option<&str>,
) -> ProviderOutcome {
    if prompt.trim().is_empty() {
        return ProviderOutcome::error("prompt must not be empty");
    }

    match send_once(gateway, provider, prompt, system_instruction, credential).await {
        Ok(text) if text.trim().is_empty() => {
            warn!("Provider {} returned an empty answer", provider);
            ProviderOutcome::error("provider returned an empty answer")
        }
        Ok(text) => {
            debug!("Provider {} answered ({} chars)", provider, text.len());
            ProviderOutcome::text(text)
        }
        Err(e) => {
            warn!("Provider {} failed: {}", provider, e);
            ProviderOutcome::error(e.to_string())
        }
    }
}

async fn send_once<G: LlmGateway + ?Sized>(
    gateway: &G,
    provider: ProviderId,
    prompt: &str,
    system_instruction: &str,
    credential: Option<&str>,
) -> Result<String, GatewayError> {
    let session = gateway
        .create_session(provider, credential, system_instruction)
        .await?;
    session.send(prompt).await
}
