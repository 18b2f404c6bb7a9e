//! Final payload returned to callers
//!
//! [`FinalPayload::assemble`] is a pure merge of the verdict with the raw
//! per-provider answers. It is deterministic and keeps configuration order.

use crate::core::provider::ProviderId;
use crate::orchestration::value_objects::RoundResult;
use crate::verdict::Verdict;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Literal written in place of an answer from a provider that failed
pub const UNAVAILABLE_SENTINEL: &str = "unavailable";

/// A provider's raw answer as shown to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    Text(String),
    Unavailable,
}

impl RawAnswer {
    pub fn as_str(&self) -> &str {
        match self {
            RawAnswer::Text(t) => t,
            RawAnswer::Unavailable => UNAVAILABLE_SENTINEL,
        }
    }
}

impl Serialize for RawAnswer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw answers keyed by provider, in configuration order
///
/// Serializes as a JSON object whose key order matches the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawAnswers(Vec<(ProviderId, RawAnswer)>);

impl RawAnswers {
    pub fn get(&self, provider: ProviderId) -> Option<&RawAnswer> {
        self.0.iter().find(|(p, _)| *p == provider).map(|(_, a)| a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &RawAnswer)> {
        self.0.iter().map(|(p, a)| (*p, a))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RawAnswers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (provider, answer) in &self.0 {
            map.serialize_entry(provider.as_str(), answer)?;
        }
        map.end()
    }
}

/// The sole externally observable output of a consensus run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalPayload {
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Provider that produced the verdict
    pub judge: ProviderId,
    pub raw_answers: RawAnswers,
}

impl FinalPayload {
    /// Merge a verdict with the round's raw answers
    pub fn assemble(verdict: Verdict, judge: ProviderId, round: &RoundResult) -> Self {
        let raw_answers = RawAnswers(
            round
                .iter()
                .map(|(provider, outcome)| {
                    let answer = match outcome.as_text() {
                        Some(text) => RawAnswer::Text(text.to_string()),
                        None => RawAnswer::Unavailable,
                    };
                    (provider, answer)
                })
                .collect(),
        );

        Self {
            verdict,
            judge,
            raw_answers,
        }
    }
}
