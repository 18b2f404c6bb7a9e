//! Consensus configuration container.
//!
//! [`ConsensusConfig`] pairs the domain [`ConsensusPolicy`] with the
//! application's [`ExecutionParams`]. It is built once at startup and
//! shared read-only by every request.

use crate::config::ExecutionParams;
use consensus_domain::{ConsensusPolicy, FanOutStrategy};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsensusConfig {
    policy: ConsensusPolicy,
    execution: ExecutionParams,
}

impl ConsensusConfig {
    pub fn new(policy: ConsensusPolicy, execution: ExecutionParams) -> Self {
        Self { policy, execution }
    }

    // ==================== Accessors ====================

    /// Provider set, judge table, strategy and banding.
    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Run bounds.
    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    // ==================== Builder Methods ====================

    pub fn with_strategy(mut self, strategy: FanOutStrategy) -> Self {
        self.policy = self.policy.with_strategy(strategy);
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}
