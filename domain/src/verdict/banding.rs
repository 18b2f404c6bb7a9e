//! Score banding policy
//!
//! Maps a 0-100 consensus score onto a [`ConsensusLevel`]. The thresholds are
//! deployment-tunable; the default is High >= 70, Medium >= 40, Low otherwise.

use crate::core::error::DomainError;
use crate::verdict::entities::ConsensusLevel;
use serde::Serialize;

/// Highest valid consensus score
pub const MAX_SCORE: u8 = 100;

/// Thresholds for banding a consensus score
///
/// # Example
///
/// ```
/// use consensus_domain::verdict::{ConsensusBanding, ConsensusLevel};
///
/// let banding = ConsensusBanding::default();
/// assert_eq!(banding.level_for(85), ConsensusLevel::High);
/// assert_eq!(banding.level_for(40), ConsensusLevel::Medium);
/// assert_eq!(banding.level_for(39), ConsensusLevel::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsensusBanding {
    /// Minimum score for `High`
    high: u8,
    /// Minimum score for `Medium`
    medium: u8,
}

impl Default for ConsensusBanding {
    fn default() -> Self {
        Self {
            high: 70,
            medium: 40,
        }
    }
}

impl ConsensusBanding {
    /// Create a banding policy; requires `medium <= high <= 100`
    pub fn new(high: u8, medium: u8) -> Result<Self, DomainError> {
        if high > MAX_SCORE {
            return Err(DomainError::InvalidPolicy(format!(
                "high threshold {} exceeds {}",
                high, MAX_SCORE
            )));
        }
        if medium > high {
            return Err(DomainError::InvalidPolicy(format!(
                "medium threshold {} exceeds high threshold {}",
                medium, high
            )));
        }
        Ok(Self { high, medium })
    }

    pub fn high(&self) -> u8 {
        self.high
    }

    pub fn medium(&self) -> u8 {
        self.medium
    }

    /// The level a score must carry under this policy
    pub fn level_for(&self, score: u8) -> ConsensusLevel {
        if score >= self.high {
            ConsensusLevel::High
        } else if score >= self.medium {
            ConsensusLevel::Medium
        } else {
            ConsensusLevel::Low
        }
    }

    /// Whether `level` is the correct band for `score`
    pub fn is_consistent(&self, score: u8, level: ConsensusLevel) -> bool {
        score <= MAX_SCORE && self.level_for(score) == level
    }

    /// Human-readable rule, embedded in the judge instruction
    pub fn description(&self) -> String {
        format!(
            "High if score >= {}, Medium if score >= {}, otherwise Low",
            self.high, self.medium
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_banding_boundaries() {
        let b = ConsensusBanding::default();
        assert_eq!(b.level_for(100), ConsensusLevel::High);
        assert_eq!(b.level_for(70), ConsensusLevel::High);
        assert_eq!(b.level_for(69), ConsensusLevel::Medium);
        assert_eq!(b.level_for(40), ConsensusLevel::Medium);
        assert_eq!(b.level_for(39), ConsensusLevel::Low);
        assert_eq!(b.level_for(0), ConsensusLevel::Low);
    }

    #[test]
    fn test_every_valid_score_has_exactly_one_consistent_level() {
        let b = ConsensusBanding::default();
        for score in 0..=MAX_SCORE {
            let consistent = [ConsensusLevel::High, ConsensusLevel::Medium, ConsensusLevel::Low]
                .into_iter()
                .filter(|l| b.is_consistent(score, *l))
                .count();
            assert_eq!(consistent, 1, "score {}", score);
        }
    }

    #[test]
    fn test_scores_above_range_are_never_consistent() {
        let b = ConsensusBanding::default();
        assert!(!b.is_consistent(101, ConsensusLevel::High));
    }

    #[test]
    fn test_custom_banding() {
        let b = ConsensusBanding::new(80, 50).unwrap();
        assert_eq!(b.level_for(75), ConsensusLevel::Medium);
        assert!(b.description().contains(">= 80"));
    }

    #[test]
    fn test_invalid_banding() {
        assert!(ConsensusBanding::new(101, 40).is_err());
        assert!(ConsensusBanding::new(40, 70).is_err());
        assert!(ConsensusBanding::new(50, 50).is_ok());
    }
}
