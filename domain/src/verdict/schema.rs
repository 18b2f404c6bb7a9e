//! JSON Schema for the judge's structured output.
//!
//! The provider enum in the schema is narrowed to the providers that actually
//! responded, so schema-constrained generation cannot attribute a claim to a
//! provider that was unavailable.

use crate::core::provider::ProviderId;
use serde_json::{Value, json};

/// Build the verdict schema for a round with the given responders
///
/// Optional fields (`warning`, `conflicts`) are nullable so the same schema
/// works for providers that require every property to be present.
pub fn verdict_json_schema(responders: &[ProviderId]) -> Value {
    let provider_names: Vec<&str> = responders.iter().map(|p| p.as_str()).collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "required": ["consensus_score", "consensus_level", "summary", "claims"],
        "properties": {
            "consensus_score": {
                "type": "integer",
                "minimum": 0,
                "maximum": 100
            },
            "consensus_level": {
                "type": "string",
                "enum": ["High", "Medium", "Low"]
            },
            "summary": {
                "type": "string",
                "minLength": 1
            },
            "claims": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["text", "supporters", "dissenters"],
                    "properties": {
                        "text": { "type": "string", "minLength": 1 },
                        "supporters": {
                            "type": "array",
                            "items": { "type": "string", "enum": provider_names }
                        },
                        "dissenters": {
                            "type": "array",
                            "items": { "type": "string", "enum": provider_names }
                        },
                        "warning": { "type": ["string", "null"] }
                    }
                }
            },
            "conflicts": {
                "type": ["array", "null"],
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["topic", "description"],
                    "properties": {
                        "topic": { "type": "string" },
                        "description": { "type": "string" }
                    }
                }
            }
        }
    })
}
