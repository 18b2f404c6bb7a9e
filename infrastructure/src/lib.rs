//! Infrastructure layer for llm-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider sessions, the judge output
//! validator, and configuration file loading.

pub mod config;
pub mod providers;
pub mod validation;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConsensusConfig, FileProviderSection,
    FileProvidersConfig, FileServerConfig,
};
pub use providers::{
    AnthropicAdapter, GeminiAdapter, HttpLlmGateway, OpenAiAdapter, ProviderAdapter,
    ProviderDescriptor, ProviderSettings,
};
pub use validation::JsonSchemaVerdictValidator;
