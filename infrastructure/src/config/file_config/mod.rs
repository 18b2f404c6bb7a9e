//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types once, at startup.

mod consensus;
mod providers;
mod server;

pub use consensus::{FileBandingConfig, FileConsensusConfig};
pub use providers::{
    FileAnthropicConfig, FileGeminiConfig, FileOpenAiConfig, FileProviderSection,
    FileProvidersConfig,
};
pub use server::FileServerConfig;

use consensus_application::ConsensusConfig;
use consensus_domain::{DomainError, ProviderId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    InvalidTimeout { field: String },

    #[error("providers.{provider}.model cannot be empty")]
    EmptyModelName { provider: ProviderId },

    #[error("{field}: unknown provider '{value}' (expected openai, anthropic or gemini)")]
    UnknownProvider { field: String, value: String },

    #[error("consensus.strategy: unknown value '{0}' (expected parallel or sequential)")]
    InvalidStrategy(String),

    #[error("server.body_limit_bytes cannot be 0")]
    InvalidBodyLimit,

    #[error("consensus policy: {0}")]
    Policy(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Provider set, judge priority, fan-out and banding
    pub consensus: FileConsensusConfig,
    /// Per-provider model, endpoint and key settings
    pub providers: FileProvidersConfig,
}

impl FileConfig {
    /// Validate the entire configuration.
    ///
    /// This is the single entry point for config validation: it returns the
    /// runtime consensus configuration only when every section is usable.
    pub fn validate(&self) -> Result<ConsensusConfig, ConfigValidationError> {
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigValidationError::InvalidBodyLimit);
        }

        let config = self.consensus.to_consensus_config()?;
        for &provider in config.policy().providers() {
            self.providers.section(provider).validate(provider)?;
        }
        Ok(config)
    }
}
