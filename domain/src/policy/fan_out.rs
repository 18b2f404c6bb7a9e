//! Fan-out execution strategy

use std::time::Duration;

/// Default pause between sequential provider calls
pub const DEFAULT_SEQUENTIAL_DELAY: Duration = Duration::from_millis(500);

/// How provider calls are issued within one round
///
/// Both strategies yield exactly one outcome per provider; they differ only
/// in latency and in how hard they hit provider rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOutStrategy {
    /// All calls concurrently, joined on a wait-for-all barrier
    #[default]
    Parallel,
    /// One call at a time in configuration order, pausing between calls
    Sequential { delay: Duration },
}

impl FanOutStrategy {
    pub fn sequential() -> Self {
        FanOutStrategy::Sequential {
            delay: DEFAULT_SEQUENTIAL_DELAY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FanOutStrategy::Parallel => "parallel",
            FanOutStrategy::Sequential { .. } => "sequential",
        }
    }
}

impl std::fmt::Display for FanOutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FanOutStrategy::Parallel => write!(f, "parallel"),
            FanOutStrategy::Sequential { delay } => {
                write!(f, "sequential ({}ms delay)", delay.as_millis())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_parallel() {
        assert_eq!(FanOutStrategy::default(), FanOutStrategy::Parallel);
    }

    #[test]
    fn test_sequential_default_delay() {
        assert_eq!(
            FanOutStrategy::sequential(),
            FanOutStrategy::Sequential {
                delay: Duration::from_millis(500)
            }
        );
        assert_eq!(FanOutStrategy::sequential().to_string(), "sequential (500ms delay)");
    }
}
