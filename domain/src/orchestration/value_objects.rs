//! Orchestration value objects - immutable results of one fan-out round.
//!
//! - [`ProviderOutcome`] - One provider's answer, or why it failed
//! - [`RoundResult`] - Every configured provider's outcome for one request

use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Result of a single provider call
///
/// Exactly one of text or error is populated, which the enum enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOutcome {
    /// The provider produced an answer
    Text(String),
    /// The provider failed; carries a human-readable message
    Error(String),
}

impl ProviderOutcome {
    pub fn text(content: impl Into<String>) -> Self {
        ProviderOutcome::Text(content.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProviderOutcome::Error(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Text(t) => Some(t),
            ProviderOutcome::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Error(e) => Some(e),
            ProviderOutcome::Text(_) => None,
        }
    }
}

/// Outcomes of every configured provider for one request
///
/// Holds exactly one outcome per configured provider, in configuration
/// order. Built through [`RoundResult::collect`], which fills any provider
/// that produced nothing with an error outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    outcomes: Vec<(ProviderId, ProviderOutcome)>,
}

impl RoundResult {
    /// Build a round from the configured provider order and the outcomes
    /// that were gathered, in any order.
    ///
    /// A provider listed twice in `providers` keeps a single slot. Outcomes
    /// for providers outside `providers` are dropped. A configured provider
    /// with no outcome is recorded as failed.
    pub fn collect(
        providers: &[ProviderId],
        gathered: impl IntoIterator<Item = (ProviderId, ProviderOutcome)>,
    ) -> Self {
        let mut gathered: Vec<(ProviderId, ProviderOutcome)> = gathered.into_iter().collect();
        let mut outcomes = Vec::with_capacity(providers.len());

        for provider in providers {
            if outcomes.iter().any(|(p, _)| p == provider) {
                continue;
            }
            let outcome = match gathered.iter().position(|(p, _)| p == provider) {
                Some(idx) => gathered.swap_remove(idx).1,
                None => ProviderOutcome::error("provider produced no outcome"),
            };
            outcomes.push((*provider, outcome));
        }

        Self { outcomes }
    }

    /// Outcome for a provider, if it is part of this round
    pub fn get(&self, provider: ProviderId) -> Option<&ProviderOutcome> {
        self.outcomes
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, o)| o)
    }

    /// Iterate outcomes in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &ProviderOutcome)> {
        self.outcomes.iter().map(|(p, o)| (*p, o))
    }

    /// Providers in configuration order
    pub fn providers(&self) -> Vec<ProviderId> {
        self.outcomes.iter().map(|(p, _)| *p).collect()
    }

    /// Providers that returned text, in configuration order
    pub fn responders(&self) -> Vec<ProviderId> {
        self.iter()
            .filter(|(_, o)| o.is_success())
            .map(|(p, _)| p)
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Per-provider failure messages formatted as `"<provider>: <message>"`
    pub fn failure_messages(&self) -> Vec<String> {
        self.iter()
            .filter_map(|(p, o)| o.as_error().map(|e| format!("{}: {}", p, e)))
            .collect()
    }
}
