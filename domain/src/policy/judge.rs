//! Judge selection
//!
//! The judge must be a model that actually answered, so selection walks a
//! fixed priority table and takes the first provider with text.

use crate::core::provider::ProviderId;
use crate::orchestration::value_objects::RoundResult;

/// Ordered judge preference table
///
/// # Example
///
/// ```
/// use consensus_domain::{JudgePriority, ProviderId, ProviderOutcome, RoundResult};
///
/// let round = RoundResult::collect(
///     &ProviderId::default_providers(),
///     vec![
///         (ProviderId::OpenAi, ProviderOutcome::text("yes")),
///         (ProviderId::Anthropic, ProviderOutcome::text("mostly")),
///         (ProviderId::Gemini, ProviderOutcome::error("down")),
///     ],
/// );
/// // Gemini is preferred but failed, so OpenAI judges.
/// assert_eq!(JudgePriority::default().choose(&round), Some(ProviderId::OpenAi));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgePriority {
    order: Vec<ProviderId>,
}

impl Default for JudgePriority {
    fn default() -> Self {
        Self {
            order: vec![ProviderId::Gemini, ProviderId::OpenAi, ProviderId::Anthropic],
        }
    }
}

impl JudgePriority {
    /// Create a priority table; later duplicates are ignored
    pub fn new(order: impl IntoIterator<Item = ProviderId>) -> Self {
        let mut deduped = Vec::new();
        for provider in order {
            if !deduped.contains(&provider) {
                deduped.push(provider);
            }
        }
        Self { order: deduped }
    }

    pub fn order(&self) -> &[ProviderId] {
        &self.order
    }

    /// Pick the highest-priority provider whose outcome carries text
    ///
    /// Returns `None` only when no prioritized provider responded.
    pub fn choose(&self, round: &RoundResult) -> Option<ProviderId> {
        self.order
            .iter()
            .copied()
            .find(|p| round.get(*p).is_some_and(|o| o.is_success()))
    }
}
