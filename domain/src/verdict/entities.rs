//! Verdict entities produced by the judge

use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Agreement band derived from the consensus score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsensusLevel {
    High,
    Medium,
    Low,
}

impl ConsensusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusLevel::High => "High",
            ConsensusLevel::Medium => "Medium",
            ConsensusLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An atomic statement from the synthesized answer with per-provider attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claim {
    pub text: String,
    pub supporters: Vec<ProviderId>,
    pub dissenters: Vec<ProviderId>,
    /// Only meaningful when `dissenters` is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            supporters: Vec::new(),
            dissenters: Vec::new(),
            warning: None,
        }
    }

    pub fn supported_by(mut self, providers: impl IntoIterator<Item = ProviderId>) -> Self {
        self.supporters = providers.into_iter().collect();
        self
    }

    pub fn disputed_by(
        mut self,
        providers: impl IntoIterator<Item = ProviderId>,
        warning: impl Into<String>,
    ) -> Self {
        self.dissenters = providers.into_iter().collect();
        self.warning = Some(warning.into());
        self
    }

    /// Whether at least one provider disputes this claim
    pub fn is_disputed(&self) -> bool {
        !self.dissenters.is_empty()
    }
}

/// A direct contradiction between provider answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Conflict {
    pub topic: String,
    pub description: String,
}

impl Conflict {
    pub fn new(topic: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            description: description.into(),
        }
    }
}

/// The judge's structured cross-reference of all provider answers
///
/// Produced once per request. Construct via
/// [`Verdict::from_judge_value`] or build one
/// directly and call [`Verdict::validate`] before trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Verdict {
    pub consensus_score: u8,
    pub consensus_level: ConsensusLevel,
    pub summary: String,
    pub claims: Vec<Claim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Conflict>>,
}

impl Verdict {
    pub fn new(
        consensus_score: u8,
        consensus_level: ConsensusLevel,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            consensus_score,
            consensus_level,
            summary: summary.into(),
            claims: Vec::new(),
            conflicts: None,
        }
    }

    pub fn with_claims(mut self, claims: Vec<Claim>) -> Self {
        self.claims = claims;
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<Conflict>) -> Self {
        self.conflicts = Some(conflicts);
        self
    }

    /// Conflicts reported by the judge (empty when none were reported)
    pub fn conflicts(&self) -> &[Conflict] {
        self.conflicts.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_builders() {
        let claim = Claim::new("Coffee contains caffeine")
            .supported_by([ProviderId::OpenAi, ProviderId::Gemini])
            .disputed_by([ProviderId::Anthropic], "Anthropic disagrees on dosage");
        assert!(claim.is_disputed());
        assert_eq!(claim.supporters.len(), 2);
        assert!(claim.warning.is_some());
    }

    #[test]
    fn test_verdict_serializes_without_empty_optionals() {
        let verdict = Verdict::new(80, ConsensusLevel::High, "Mostly agreed")
            .with_claims(vec![Claim::new("x").supported_by([ProviderId::OpenAi])]);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["consensus_level"], "High");
        assert!(json.get("conflicts").is_none());
        assert!(json["claims"][0].get("warning").is_none());
        assert_eq!(json["claims"][0]["supporters"][0], "openai");
    }

    #[test]
    fn test_verdict_rejects_unknown_fields() {
        let result = serde_json::from_str::<Verdict>(
            r#"{"consensus_score": 10, "consensus_level": "Low", "summary": "s",
                "claims": [], "extra": true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_null_conflicts_decode_as_absent() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"consensus_score": 10, "consensus_level": "Low", "summary": "s",
                "claims": [], "conflicts": null}"#,
        )
        .unwrap();
        assert!(verdict.conflicts().is_empty());
    }
}
