//! Verdict validation port
//!
//! The judge's answer is an untyped payload until it passes validation.
//! Implementations run a strict schema check and then the domain rules in
//! [`Verdict::validate`](consensus_domain::Verdict::validate).

use consensus_domain::{ConsensusBanding, ProviderId, Verdict, VerdictError};

/// Turns raw judge output into a trusted [`Verdict`]
pub trait VerdictValidator: Send + Sync {
    /// Validate `judge_output` for a round whose responders are `responders`.
    ///
    /// Must reject, never repair: any schema or rule violation is an error.
    fn validate(
        &self,
        judge_output: &str,
        responders: &[ProviderId],
        banding: &ConsensusBanding,
    ) -> Result<Verdict, VerdictError>;
}
