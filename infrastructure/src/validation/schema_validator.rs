//! Strict JSON Schema gate in front of the domain verdict rules

use crate::providers::response_parsing::extract_json_payload;
use consensus_application::VerdictValidator;
use consensus_domain::{
    ConsensusBanding, ProviderId, Verdict, VerdictError, verdict_json_schema,
};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

/// Validates judge output in three steps: JSON extraction, the verdict
/// JSON Schema for the round's responders, then [`Verdict::from_judge_value`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaVerdictValidator;

impl JsonSchemaVerdictValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_schema(value: &Value, responders: &[ProviderId]) -> Result<(), VerdictError> {
        let schema = verdict_json_schema(responders);
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|err| VerdictError::Schema(format!("verdict schema did not compile: {err}")))?;

        compiled.validate(value).map_err(schema_validation_error)?;
        Ok(())
    }
}

impl VerdictValidator for JsonSchemaVerdictValidator {
    fn validate(
        &self,
        judge_output: &str,
        responders: &[ProviderId],
        banding: &ConsensusBanding,
    ) -> Result<Verdict, VerdictError> {
        let payload = extract_json_payload(judge_output).ok_or(VerdictError::MissingJson)?;
        let value: Value =
            serde_json::from_str(payload).map_err(|err| VerdictError::InvalidJson(err.to_string()))?;

        Self::check_schema(&value, responders)?;
        debug!("Judge output passed schema validation");

        Verdict::from_judge_value(value, responders, banding)
    }
}

fn schema_validation_error<'a, I>(errors: I) -> VerdictError
where
    I: IntoIterator<Item = jsonschema::ValidationError<'a>>,
{
    let details = errors
        .into_iter()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    VerdictError::Schema(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::ConsensusLevel;
    use serde_json::json;

    fn responders() -> Vec<ProviderId> {
        vec![ProviderId::OpenAi, ProviderId::Gemini]
    }

    fn validate(output: &str) -> Result<Verdict, VerdictError> {
        JsonSchemaVerdictValidator::new().validate(
            output,
            &responders(),
            &ConsensusBanding::default(),
        )
    }

    fn verdict_json() -> Value {
        json!({
            "consensus_score": 55,
            "consensus_level": "Medium",
            "summary": "Coffee is fine in moderation, but the safe amount is disputed.",
            "claims": [
                {
                    "text": "Moderate coffee intake is safe for most adults.",
                    "supporters": ["openai", "gemini"],
                    "dissenters": []
                },
                {
                    "text": "Up to six cups a day is safe.",
                    "supporters": ["gemini"],
                    "dissenters": ["openai"],
                    "warning": "OpenAI puts the limit at four cups."
                }
            ],
            "conflicts": [
                {"topic": "Daily limit", "description": "Four cups versus six cups."}
            ]
        })
    }

    #[test]
    fn test_accepts_valid_verdict() {
        let verdict = validate(&verdict_json().to_string()).unwrap();

        assert_eq!(verdict.consensus_level, ConsensusLevel::Medium);
        assert_eq!(verdict.claims.len(), 2);
        assert_eq!(verdict.conflicts().len(), 1);
    }

    #[test]
    fn test_accepts_fenced_output_with_null_optionals() {
        let mut value = verdict_json();
        value["conflicts"] = Value::Null;
        value["claims"][0]["warning"] = Value::Null;
        let output = format!("```json\n{}\n```", value);

        let verdict = validate(&output).unwrap();
        assert!(verdict.conflicts().is_empty());
    }

    #[test]
    fn test_rejects_prose() {
        assert!(matches!(
            validate("The providers broadly agree."),
            Err(VerdictError::MissingJson)
        ));
    }

    #[test]
    fn test_rejects_broken_json() {
        assert!(matches!(
            validate("{\"consensus_score\": 55,"),
            Err(VerdictError::InvalidJson(_)) | Err(VerdictError::MissingJson)
        ));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let mut value = verdict_json();
        value["confidence"] = json!("high");

        assert!(matches!(
            validate(&value.to_string()),
            Err(VerdictError::Schema(_))
        ));
    }

    #[test]
    fn test_rejects_attribution_outside_responders() {
        let mut value = verdict_json();
        value["claims"][0]["supporters"] = json!(["anthropic"]);

        let err = validate(&value.to_string()).unwrap_err();
        match err {
            VerdictError::Schema(details) => assert!(details.contains("anthropic")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_score_out_of_range() {
        let mut value = verdict_json();
        value["consensus_score"] = json!(140);
        value["consensus_level"] = json!("High");

        assert!(matches!(
            validate(&value.to_string()),
            Err(VerdictError::Schema(_))
        ));
    }

    #[test]
    fn test_domain_rules_run_after_schema() {
        // Schema-valid, but the level disagrees with the banding
        let mut value = verdict_json();
        value["consensus_level"] = json!("High");

        assert!(matches!(
            validate(&value.to_string()),
            Err(VerdictError::LevelMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_required_field_lists_the_problem() {
        let mut value = verdict_json();
        value.as_object_mut().unwrap().remove("summary");

        match validate(&value.to_string()).unwrap_err() {
            VerdictError::Schema(details) => assert!(details.contains("summary")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
