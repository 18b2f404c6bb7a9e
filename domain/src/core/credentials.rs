//! Request-scoped provider credentials

use crate::core::provider::ProviderId;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};

/// Caller-supplied provider secrets for a single request (Value Object)
///
/// A missing or blank entry means "use the deployment default credential".
/// Secrets are never printed: `Debug` only shows which providers carry a key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    keys: BTreeMap<ProviderId, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret for a provider. Blank secrets are dropped.
    pub fn with_key(mut self, provider: ProviderId, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    pub fn insert(&mut self, provider: ProviderId, secret: impl Into<String>) {
        let secret = secret.into();
        if secret.trim().is_empty() {
            self.keys.remove(&provider);
        } else {
            self.keys.insert(provider, secret.trim().to_string());
        }
    }

    /// The caller's secret for a provider, if one was supplied
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.keys.keys().map(|p| p.as_str()))
            .finish()
    }
}

impl<'de> Deserialize<'de> for Credentials {
    /// Accepts `{"openai": "...", "gemini": null, ...}`.
    /// Unknown provider names are ignored.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut credentials = Credentials::new();
        for (name, secret) in raw {
            if let (Ok(provider), Some(secret)) = (name.parse::<ProviderId>(), secret) {
                credentials.insert(provider, secret);
            }
        }
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_are_dropped() {
        let creds = Credentials::new()
            .with_key(ProviderId::OpenAi, "  ")
            .with_key(ProviderId::Gemini, "g-key");
        assert_eq!(creds.get(ProviderId::OpenAi), None);
        assert_eq!(creds.get(ProviderId::Gemini), Some("g-key"));
    }

    #[test]
    fn test_deserialize_ignores_unknown_and_null() {
        let creds: Credentials = serde_json::from_str(
            r#"{"openai": "sk-1", "gemini": null, "anthropic": "", "mistral": "x"}"#,
        )
        .unwrap();
        assert_eq!(creds.get(ProviderId::OpenAi), Some("sk-1"));
        assert_eq!(creds.get(ProviderId::Gemini), None);
        assert_eq!(creds.get(ProviderId::Anthropic), None);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::new().with_key(ProviderId::OpenAi, "sk-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("openai"));
        assert!(!debug.contains("sk-secret"));
    }
}
