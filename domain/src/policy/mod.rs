//! Consensus policy table
//!
//! Everything that decides *how* a round runs lives here as data: which
//! providers are queried and in which order, who judges, how calls are
//! scheduled and how many answers are required before synthesis.
//!
//! | Knob | Default |
//! |------|---------|
//! | `providers` | openai, anthropic, gemini |
//! | `judge_priority` | gemini, openai, anthropic |
//! | `strategy` | parallel |
//! | `min_successes` | 1 |
//! | `banding` | High >= 70, Medium >= 40 |

pub mod fan_out;
pub mod judge;

use crate::core::error::DomainError;
use crate::core::provider::ProviderId;
use crate::verdict::ConsensusBanding;
pub use fan_out::FanOutStrategy;
pub use judge::JudgePriority;

/// Deployment policy for one consensus pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusPolicy {
    providers: Vec<ProviderId>,
    judge_priority: JudgePriority,
    strategy: FanOutStrategy,
    min_successes: usize,
    banding: ConsensusBanding,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            providers: ProviderId::default_providers(),
            judge_priority: JudgePriority::default(),
            strategy: FanOutStrategy::default(),
            min_successes: 1,
            banding: ConsensusBanding::default(),
        }
    }
}

impl ConsensusPolicy {
    /// Create a policy, checking that the provider list and threshold make sense
    pub fn new(
        providers: Vec<ProviderId>,
        judge_priority: JudgePriority,
        strategy: FanOutStrategy,
        min_successes: usize,
        banding: ConsensusBanding,
    ) -> Result<Self, DomainError> {
        if providers.is_empty() {
            return Err(DomainError::NoProviders);
        }
        for (i, provider) in providers.iter().enumerate() {
            if providers[..i].contains(provider) {
                return Err(DomainError::DuplicateProvider(provider.to_string()));
            }
        }
        if min_successes == 0 || min_successes > providers.len() {
            return Err(DomainError::InvalidPolicy(format!(
                "min_successes must be between 1 and {}, got {}",
                providers.len(),
                min_successes
            )));
        }
        if !judge_priority.order().iter().any(|p| providers.contains(p)) {
            return Err(DomainError::InvalidPolicy(
                "judge priority names none of the configured providers".to_string(),
            ));
        }

        Ok(Self {
            providers,
            judge_priority,
            strategy,
            min_successes,
            banding,
        })
    }

    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn judge_priority(&self) -> &JudgePriority {
        &self.judge_priority
    }

    pub fn strategy(&self) -> FanOutStrategy {
        self.strategy
    }

    pub fn min_successes(&self) -> usize {
        self.min_successes
    }

    pub fn banding(&self) -> &ConsensusBanding {
        &self.banding
    }

    // ==================== Builder Methods ====================

    /// Replace the fan-out strategy (e.g. a CLI `--sequential` override)
    pub fn with_strategy(mut self, strategy: FanOutStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
