//! Consensus policy configuration from TOML (`[consensus]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [consensus]
//! providers = ["openai", "anthropic", "gemini"]
//! judge_priority = ["gemini", "openai", "anthropic"]
//! strategy = "sequential"        # or "parallel"
//! sequential_delay_ms = 500
//! min_successes = 2
//! request_timeout_seconds = 60
//!
//! [consensus.banding]
//! high = 70
//! medium = 40
//! ```

use super::ConfigValidationError;
use consensus_application::{ConsensusConfig, ExecutionParams};
use consensus_domain::{
    ConsensusBanding, ConsensusPolicy, FanOutStrategy, JudgePriority, ProviderId,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Providers asked on every request, in output order
    pub providers: Vec<String>,
    /// Judge preference, first responding provider wins
    pub judge_priority: Vec<String>,
    /// "parallel" or "sequential"
    pub strategy: String,
    /// Pause between sequential calls
    pub sequential_delay_ms: u64,
    /// Answers needed before synthesis runs
    pub min_successes: usize,
    /// Limit for one whole request (fan-out plus synthesis)
    pub request_timeout_seconds: u64,
    pub banding: FileBandingConfig,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        let policy = ConsensusPolicy::default();
        Self {
            providers: names(policy.providers()),
            judge_priority: names(policy.judge_priority().order()),
            strategy: "parallel".to_string(),
            sequential_delay_ms: 500,
            min_successes: policy.min_successes(),
            request_timeout_seconds: ExecutionParams::default().request_timeout.as_secs(),
            banding: FileBandingConfig::default(),
        }
    }
}

/// Score thresholds for the consensus level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBandingConfig {
    /// Scores at or above this are High
    pub high: u8,
    /// Scores at or above this (and below `high`) are Medium
    pub medium: u8,
}

impl Default for FileBandingConfig {
    fn default() -> Self {
        let banding = ConsensusBanding::default();
        Self {
            high: banding.high(),
            medium: banding.medium(),
        }
    }
}

fn names(providers: &[ProviderId]) -> Vec<String> {
    providers.iter().map(|p| p.as_str().to_string()).collect()
}

fn parse_providers(field: &str, values: &[String]) -> Result<Vec<ProviderId>, ConfigValidationError> {
    values
        .iter()
        .map(|v| {
            v.parse().map_err(|_| ConfigValidationError::UnknownProvider {
                field: field.to_string(),
                value: v.clone(),
            })
        })
        .collect()
}

impl FileConsensusConfig {
    /// Parse the strategy string into a [`FanOutStrategy`]
    pub fn parse_strategy(&self) -> Result<FanOutStrategy, ConfigValidationError> {
        match self.strategy.trim().to_lowercase().as_str() {
            "parallel" => Ok(FanOutStrategy::Parallel),
            "sequential" => Ok(FanOutStrategy::Sequential {
                delay: Duration::from_millis(self.sequential_delay_ms),
            }),
            _ => Err(ConfigValidationError::InvalidStrategy(self.strategy.clone())),
        }
    }

    /// Build the validated runtime configuration
    pub fn to_consensus_config(&self) -> Result<ConsensusConfig, ConfigValidationError> {
        if self.request_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "consensus.request_timeout_seconds".to_string(),
            });
        }

        let providers = parse_providers("consensus.providers", &self.providers)?;
        let judge_priority = parse_providers("consensus.judge_priority", &self.judge_priority)?;
        let banding = ConsensusBanding::new(self.banding.high, self.banding.medium)?;

        let policy = ConsensusPolicy::new(
            providers,
            JudgePriority::new(judge_priority),
            self.parse_strategy()?,
            self.min_successes,
            banding,
        )?;
        let execution =
            ExecutionParams::default().with_request_timeout_seconds(self.request_timeout_seconds);

        Ok(ConsensusConfig::new(policy, execution))
    }
}
