//! Application layer for llm-consensus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConsensusConfig, DEFAULT_REQUEST_TIMEOUT, ExecutionParams};
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
    verdict_validator::VerdictValidator,
};
pub use use_cases::run_consensus::{
    RunConsensusError, RunConsensusInput, RunConsensusUseCase, SynthesisError,
};
pub use use_cases::shared::generate;
