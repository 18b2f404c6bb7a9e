//! Application-level configuration.
//!
//! - [`ExecutionParams`] — run bounds (request timeout)
//! - [`ConsensusConfig`] — policy plus execution params, shared by every request

pub mod consensus_config;
pub mod execution_params;

pub use consensus_config::ConsensusConfig;
pub use execution_params::{DEFAULT_REQUEST_TIMEOUT, ExecutionParams};
