//! Configuration for a character-creation session.

use crate::ability::MAX_TOTAL;

/// Default minimum total for generated ability scores.
pub const DEFAULT_THRESHOLD: u32 = 70;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Minimum total of the six generated ability scores.
    pub threshold: u32,
    /// RNG seed for reproducible rolls; drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Set the score threshold. Values above what six rolls can reach
    /// are kept and rejected by the generator.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the threshold can be met at all.
    pub fn is_feasible(&self) -> bool {
        self.threshold <= MAX_TOTAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.threshold, 70);
        assert_eq!(cfg.seed, None);
        assert!(cfg.is_feasible());
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default().with_threshold(60).with_seed(123);
        assert_eq!(cfg.threshold, 60);
        assert_eq!(cfg.seed, Some(123));
    }

    #[test]
    fn infeasible_threshold_kept() {
        let cfg = SessionConfig::default().with_threshold(200);
        assert_eq!(cfg.threshold, 200);
        assert!(!cfg.is_feasible());
    }
}
