//! Provider dialects of the verdict JSON schema.
//!
//! The canonical schema is full JSON Schema and is what the local validator
//! enforces. Providers accept narrower subsets for constrained decoding, so
//! each adapter sends a rewritten copy. Dropped keywords are still checked
//! locally after the response comes back.

use serde_json::{Map, Value};

/// OpenAI strict structured outputs.
///
/// Every object lists all of its properties as required and forbids extra
/// ones; optional fields stay optional through their nullable type.
pub(crate) fn openai_strict(schema: &Value) -> Value {
    rewrite(schema, &|object| {
        object.remove("$schema");
        object.remove("minLength");
        object.remove("minimum");
        object.remove("maximum");

        if let Some(Value::Object(properties)) = object.get("properties") {
            let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
            object.insert("required".to_string(), Value::Array(required));
            object.insert("additionalProperties".to_string(), Value::Bool(false));
        }
    })
}

/// Gemini `responseSchema` (OpenAPI 3.0 subset).
///
/// `["T", "null"]` becomes `T` with `nullable: true`; type names are upper-cased.
pub(crate) fn gemini_response_schema(schema: &Value) -> Value {
    rewrite(schema, &|object| {
        object.remove("$schema");
        object.remove("additionalProperties");
        object.remove("minLength");

        let rewritten = match object.get("type") {
            Some(Value::String(t)) => Some((t.to_uppercase(), false)),
            Some(Value::Array(types)) => {
                let nullable = types.iter().any(|t| t == "null");
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .find(|t| *t != "null")
                    .map(|t| (t.to_uppercase(), nullable))
            }
            _ => None,
        };

        if let Some((type_name, nullable)) = rewritten {
            object.insert("type".to_string(), Value::String(type_name));
            if nullable {
                object.insert("nullable".to_string(), Value::Bool(true));
            }
        }
    })
}

/// Apply `edit` to every schema object, bottom-up.
///
/// Only schema positions are visited (`properties` values, `items`), so a
/// property that happens to be named like a keyword is left alone.
fn rewrite(schema: &Value, edit: &dyn Fn(&mut Map<String, Value>)) -> Value {
    let Value::Object(source) = schema else {
        return schema.clone();
    };

    let mut object = Map::new();
    for (key, value) in source {
        let value = match key.as_str() {
            "properties" => match value {
                Value::Object(props) => Value::Object(
                    props
                        .iter()
                        .map(|(name, sub)| (name.clone(), rewrite(sub, edit)))
                        .collect(),
                ),
                other => other.clone(),
            },
            "items" => rewrite(value, edit),
            _ => value.clone(),
        };
        object.insert(key.clone(), value);
    }

    edit(&mut object);
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{ProviderId, verdict_json_schema};

    fn schema() -> Value {
        verdict_json_schema(&[ProviderId::OpenAi, ProviderId::Anthropic])
    }

    #[test]
    fn test_openai_strict_requires_every_property() {
        let strict = openai_strict(&schema());
        let claim = &strict["properties"]["claims"]["items"];

        assert_eq!(
            claim["required"],
            serde_json::json!(["dissenters", "supporters", "text", "warning"])
        );
        assert_eq!(claim["additionalProperties"], Value::Bool(false));
        assert!(
            strict["required"]
                .as_array()
                .unwrap()
                .contains(&Value::String("conflicts".into()))
        );
        assert!(strict.get("$schema").is_none());
        assert!(strict["properties"]["consensus_score"].get("minimum").is_none());
    }

    #[test]
    fn test_openai_strict_keeps_provider_enum() {
        let strict = openai_strict(&schema());
        assert_eq!(
            strict["properties"]["claims"]["items"]["properties"]["supporters"]["items"]["enum"],
            serde_json::json!(["openai", "anthropic"])
        );
    }

    #[test]
    fn test_gemini_schema_uses_nullable() {
        let gemini = gemini_response_schema(&schema());

        assert_eq!(gemini["type"], "OBJECT");
        assert_eq!(gemini["properties"]["conflicts"]["type"], "ARRAY");
        assert_eq!(gemini["properties"]["conflicts"]["nullable"], true);
        assert_eq!(
            gemini["properties"]["claims"]["items"]["properties"]["warning"]["type"],
            "STRING"
        );
        assert!(gemini.get("additionalProperties").is_none());
        assert!(gemini.get("$schema").is_none());
        assert!(gemini["properties"]["summary"].get("minLength").is_none());
    }

    #[test]
    fn test_canonical_schema_is_untouched() {
        let original = schema();
        let _ = openai_strict(&original);
        let _ = gemini_response_schema(&original);
        assert_eq!(original, schema());
    }
}
