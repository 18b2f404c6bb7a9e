//! Shared application state for the HTTP API

use consensus_application::{LlmGateway, RunConsensusUseCase};
use consensus_domain::ProviderId;
use serde::Serialize;
use std::sync::Arc;

/// A configured provider slot as reported by `GET /api/providers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderId,
    pub model: String,
    pub has_default_key: bool,
}

/// Immutable state shared by every handler
pub struct AppState {
    pub use_case: Arc<RunConsensusUseCase<dyn LlmGateway>>,
    /// Configured providers, in configuration order
    pub providers: Vec<ProviderInfo>,
    pub version: String,
}

impl AppState {
    pub fn new(
        use_case: Arc<RunConsensusUseCase<dyn LlmGateway>>,
        providers: Vec<ProviderInfo>,
    ) -> Self {
        Self {
            use_case,
            providers,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
