//! The choice collaborator the progression engine asks for every selection.
//!
//! A [`Prompt`] only presents candidates and returns what was picked. The
//! engine checks every answer itself, so a misbehaving prompt surfaces as
//! [`crate::MechError::IneligibleChoice`] rather than as a corrupt record.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Failures raised by a prompt implementation.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input ended before a selection was made.
    #[error("input closed before a selection was made")]
    Closed,

    /// Reading input or writing the menu failed.
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Obtains selections from a player (or a stand-in for one).
pub trait Prompt {
    /// Pick exactly `count` distinct entries from `candidates`.
    fn choose(
        &mut self,
        message: &str,
        candidates: &[String],
        count: usize,
    ) -> Result<Vec<String>, PromptError>;

    /// Answer a yes/no question.
    fn confirm(&mut self, message: &str) -> Result<bool, PromptError>;
}

/// Chooses uniformly at random from a seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomPrompt {
    rng: StdRng,
    yes_chance: f64,
}

impl RandomPrompt {
    /// A prompt seeded for reproducible characters.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            yes_chance: 0.25,
        }
    }

    /// Probability of answering yes to a confirmation (clamped to 0-1).
    pub fn with_yes_chance(mut self, chance: f64) -> Self {
        self.yes_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl Prompt for RandomPrompt {
    fn choose(
        &mut self,
        _message: &str,
        candidates: &[String],
        count: usize,
    ) -> Result<Vec<String>, PromptError> {
        Ok(candidates
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect())
    }

    fn confirm(&mut self, _message: &str) -> Result<bool, PromptError> {
        Ok(self.rng.random_bool(self.yes_chance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        ["Acrobatics", "Arcana", "History", "Stealth"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn random_choices_are_distinct_members() {
        let mut prompt = RandomPrompt::new(3);
        let picked = prompt.choose("skills", &candidates(), 3).unwrap();
        assert_eq!(picked.len(), 3);
        for pick in &picked {
            assert!(candidates().contains(pick));
            assert_eq!(picked.iter().filter(|p| *p == pick).count(), 1);
        }
    }

    #[test]
    fn random_prompt_is_reproducible() {
        let a = RandomPrompt::new(11).choose("skills", &candidates(), 2).unwrap();
        let b = RandomPrompt::new(11).choose("skills", &candidates(), 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn yes_chance_extremes() {
        let mut never = RandomPrompt::new(1).with_yes_chance(-1.0);
        let mut always = RandomPrompt::new(1).with_yes_chance(2.0);
        for _ in 0..20 {
            assert!(!never.confirm("again?").unwrap());
            assert!(always.confirm("again?").unwrap());
        }
    }
}
