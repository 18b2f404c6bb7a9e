//! Configuration file loading for llm-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONSENSUS_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./consensus.toml` or `./.consensus.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/llm-consensus/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnthropicConfig, FileBandingConfig, FileConfig,
    FileConsensusConfig, FileGeminiConfig, FileOpenAiConfig, FileProviderSection,
    FileProvidersConfig, FileServerConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
