//! Domain layer for llm-consensus
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! Every configured provider answers the same question once. The outcomes
//! form a [`RoundResult`]: one [`ProviderOutcome`] per provider, in
//! configuration order.
//!
//! ## Verdict
//!
//! A judge (the highest-priority provider that answered) cross-references the
//! answers into a [`Verdict`]: a 0-100 consensus score, its band, a summary,
//! attributed claims and optional conflicts.
//!
//! ## Policy
//!
//! Provider order, judge priority, fan-out strategy, the minimum number of
//! answers and the score banding are data in a [`ConsensusPolicy`].

pub mod core;
pub mod orchestration;
pub mod payload;
pub mod policy;
pub mod prompt;
pub mod verdict;

// Re-export commonly used types
pub use core::{
    credentials::Credentials, error::DomainError, provider::ProviderId, question::Question,
};
pub use orchestration::{
    entities::Phase,
    value_objects::{ProviderOutcome, RoundResult},
};
pub use payload::{FinalPayload, RawAnswer, RawAnswers, UNAVAILABLE_SENTINEL};
pub use policy::{ConsensusPolicy, FanOutStrategy, JudgePriority};
pub use prompt::{PromptTemplate, UNAVAILABLE_MARKER};
pub use verdict::{
    Claim, Conflict, ConsensusBanding, ConsensusLevel, Verdict, VerdictError, verdict_json_schema,
};
