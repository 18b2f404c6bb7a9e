//! Domain rules a judge verdict must satisfy.
//!
//! Schema conformance alone is not enough: a well-formed verdict can still
//! attribute a claim to a provider that never answered, or carry a level that
//! disagrees with its score. These checks run after schema validation and
//! reject, never repair.

use crate::core::provider::ProviderId;
use crate::verdict::banding::{ConsensusBanding, MAX_SCORE};
use crate::verdict::entities::{ConsensusLevel, Verdict};
use thiserror::Error;

/// Why a judge's output was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerdictError {
    #[error("judge output did not contain a JSON object")]
    MissingJson,

    #[error("judge output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("judge output failed schema validation: {0}")]
    Schema(String),

    #[error("judge output does not match the verdict shape: {0}")]
    Decode(String),

    #[error("consensus_score {0} is outside 0-100")]
    ScoreOutOfRange(u8),

    #[error("consensus_level {level} is inconsistent with score {score} (expected {expected})")]
    LevelMismatch {
        score: u8,
        level: ConsensusLevel,
        expected: ConsensusLevel,
    },

    #[error("summary must not be empty")]
    EmptySummary,

    #[error("claim {index} has empty text")]
    EmptyClaim { index: usize },

    #[error("claim {index} attributes {provider}, which did not respond")]
    NonResponderAttribution { index: usize, provider: ProviderId },

    #[error("claim {index} lists {provider} more than once")]
    DuplicateAttribution { index: usize, provider: ProviderId },

    #[error("claim {index} lists {provider} as both supporter and dissenter")]
    ContradictoryAttribution { index: usize, provider: ProviderId },

    #[error("claim {index} carries a warning but has no dissenters")]
    WarningWithoutDissent { index: usize },

    #[error("conflict {index} has an empty topic or description")]
    EmptyConflict { index: usize },
}

impl Verdict {
    /// Check every domain rule against the providers that responded in the round
    pub fn validate(
        &self,
        responders: &[ProviderId],
        banding: &ConsensusBanding,
    ) -> Result<(), VerdictError> {
        if self.consensus_score > MAX_SCORE {
            return Err(VerdictError::ScoreOutOfRange(self.consensus_score));
        }

        if !banding.is_consistent(self.consensus_score, self.consensus_level) {
            return Err(VerdictError::LevelMismatch {
                score: self.consensus_score,
                level: self.consensus_level,
                expected: banding.level_for(self.consensus_score),
            });
        }

        if self.summary.trim().is_empty() {
            return Err(VerdictError::EmptySummary);
        }

        for (index, claim) in self.claims.iter().enumerate() {
            if claim.text.trim().is_empty() {
                return Err(VerdictError::EmptyClaim { index });
            }

            for group in [&claim.supporters, &claim.dissenters] {
                for (pos, provider) in group.iter().enumerate() {
                    if !responders.contains(provider) {
                        return Err(VerdictError::NonResponderAttribution {
                            index,
                            provider: *provider,
                        });
                    }
                    if group[..pos].contains(provider) {
                        return Err(VerdictError::DuplicateAttribution {
                            index,
                            provider: *provider,
                        });
                    }
                }
            }

            if let Some(provider) = claim
                .supporters
                .iter()
                .find(|p| claim.dissenters.contains(p))
            {
                return Err(VerdictError::ContradictoryAttribution {
                    index,
                    provider: *provider,
                });
            }

            if claim.warning.is_some() && claim.dissenters.is_empty() {
                return Err(VerdictError::WarningWithoutDissent { index });
            }
        }

        for (index, conflict) in self.conflicts().iter().enumerate() {
            if conflict.topic.trim().is_empty() || conflict.description.trim().is_empty() {
                return Err(VerdictError::EmptyConflict { index });
            }
        }

        Ok(())
    }

    /// Decode an untyped judge payload and enforce the domain rules
    pub fn from_judge_value(
        value: serde_json::Value,
        responders: &[ProviderId],
        banding: &ConsensusBanding,
    ) -> Result<Self, VerdictError> {
        let verdict: Verdict =
            serde_json::from_value(value).map_err(|e| VerdictError::Decode(e.to_string()))?;
        verdict.validate(responders, banding)?;
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::entities::{Claim, Conflict};
    use serde_json::json;

    fn responders() -> Vec<ProviderId> {
        vec![ProviderId::Anthropic, ProviderId::Gemini]
    }

    fn valid() -> Verdict {
        Verdict::new(75, ConsensusLevel::High, "Moderate coffee intake is fine.").with_claims(
            vec![
                Claim::new("Coffee contains antioxidants")
                    .supported_by([ProviderId::Anthropic, ProviderId::Gemini]),
                Claim::new("Four cups a day is safe")
                    .supported_by([ProviderId::Gemini])
                    .disputed_by([ProviderId::Anthropic], "Anthropic suggests fewer cups"),
            ],
        )
    }

    #[test]
    fn test_valid_verdict_passes() {
        assert!(valid().validate(&responders(), &ConsensusBanding::default()).is_ok());
    }

    #[test]
    fn test_level_mismatch_rejected() {
        let mut v = valid();
        v.consensus_level = ConsensusLevel::Low;
        let err = v
            .validate(&responders(), &ConsensusBanding::default())
            .unwrap_err();
        assert!(matches!(
            err,
            VerdictError::LevelMismatch {
                expected: ConsensusLevel::High,
                ..
            }
        ));
    }

    #[test]
    fn test_level_follows_configured_banding() {
        let banding = ConsensusBanding::new(80, 50).unwrap();
        let mut v = valid();
        assert!(matches!(
            v.validate(&responders(), &banding),
            Err(VerdictError::LevelMismatch {
                expected: ConsensusLevel::Medium,
                ..
            })
        ));
        v.consensus_level = ConsensusLevel::Medium;
        assert!(v.validate(&responders(), &banding).is_ok());
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let mut v = valid();
        v.consensus_score = 120;
        assert_eq!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::ScoreOutOfRange(120))
        );
    }

    #[test]
    fn test_attribution_to_non_responder_rejected() {
        let mut v = valid();
        v.claims[0].supporters.push(ProviderId::OpenAi);
        assert_eq!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::NonResponderAttribution {
                index: 0,
                provider: ProviderId::OpenAi
            })
        );
    }

    #[test]
    fn test_dissent_from_non_responder_rejected() {
        let mut v = valid();
        v.claims[1].dissenters = vec![ProviderId::OpenAi];
        assert!(matches!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::NonResponderAttribution { index: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_and_contradictory_attribution_rejected() {
        let mut v = valid();
        v.claims[0].supporters = vec![ProviderId::Gemini, ProviderId::Gemini];
        assert!(matches!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::DuplicateAttribution { index: 0, .. })
        ));

        let mut v = valid();
        v.claims[1].supporters = vec![ProviderId::Anthropic];
        assert!(matches!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::ContradictoryAttribution { index: 1, .. })
        ));
    }

    #[test]
    fn test_warning_requires_dissenters() {
        let mut v = valid();
        v.claims[0].warning = Some("stray warning".into());
        assert_eq!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::WarningWithoutDissent { index: 0 })
        );
    }

    #[test]
    fn test_empty_claims_allowed_but_empty_summary_rejected() {
        let v = Verdict::new(20, ConsensusLevel::Low, "Answers diverge.");
        assert!(v.validate(&responders(), &ConsensusBanding::default()).is_ok());

        let v = Verdict::new(20, ConsensusLevel::Low, "  ");
        assert_eq!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::EmptySummary)
        );
    }

    #[test]
    fn test_empty_conflict_rejected() {
        let v = valid().with_conflicts(vec![Conflict::new("Dosage", "")]);
        assert_eq!(
            v.validate(&responders(), &ConsensusBanding::default()),
            Err(VerdictError::EmptyConflict { index: 0 })
        );
    }

    #[test]
    fn test_from_judge_value() {
        let value = json!({
            "consensus_score": 45,
            "consensus_level": "Medium",
            "summary": "Partly agreed",
            "claims": [
                {"text": "A", "supporters": ["gemini"], "dissenters": [], "warning": null}
            ],
            "conflicts": [{"topic": "B", "description": "C"}]
        });
        let verdict =
            Verdict::from_judge_value(value, &responders(), &ConsensusBanding::default()).unwrap();
        assert_eq!(verdict.consensus_level, ConsensusLevel::Medium);
        assert_eq!(verdict.conflicts().len(), 1);
    }

    #[test]
    fn test_from_judge_value_rejects_bad_shape() {
        let value = json!({"consensus_score": "high", "summary": "x"});
        assert!(matches!(
            Verdict::from_judge_value(value, &responders(), &ConsensusBanding::default()),
            Err(VerdictError::Decode(_))
        ));
    }
}
