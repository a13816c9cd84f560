//! The progression engine: one session builds one character.
//!
//! A [`Session`] walks the phases in order (class, background, species,
//! ability scores, multiclassing, alignment and gender, feats, spells,
//! finalize). Every selection goes through the session's [`Prompt`] and is
//! checked against the candidates it was offered; any error ends the
//! session and the partial record is dropped with it.

mod grants;
mod phases;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tasha_srd::Srd;

use crate::config::SessionConfig;
use crate::error::{MechError, MechResult};
use crate::prompt::Prompt;
use crate::sheet::{CharacterState, Field};

pub use phases::{ASI_FEAT, ASI_PLUS_ONE, ASI_PLUS_TWO, SPLIT_EVEN, SPLIT_TWO_ONE};

/// A character-creation session.
pub struct Session<'a, P> {
    srd: &'a Srd,
    prompt: P,
    rng: StdRng,
    config: SessionConfig,
    state: CharacterState,
}

impl<'a, P: Prompt> Session<'a, P> {
    /// Start a session. Rejects thresholds the generator can never meet.
    pub fn new(srd: &'a Srd, prompt: P, config: SessionConfig) -> MechResult<Self> {
        if !config.is_feasible() {
            return Err(MechError::InfeasibleThreshold {
                threshold: config.threshold,
                max: crate::ability::MAX_TOTAL,
            });
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, threshold = config.threshold, "session started");
        Ok(Self {
            srd,
            prompt,
            rng: StdRng::seed_from_u64(seed),
            config,
            state: CharacterState::new(),
        })
    }

    /// The record built so far.
    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    /// Give up the session and keep its record.
    pub fn into_state(self) -> CharacterState {
        self.state
    }

    /// Throw away the record and start over with the same collaborators.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Run every phase and return the finalized character.
    pub fn run(mut self, name: &str) -> MechResult<CharacterState> {
        self.state.set(Field::Name, name)?;
        self.class_phase()?;
        self.background_phase()?;
        self.species_phase()?;
        self.ability_phase()?;
        self.multiclass_phase()?;
        self.details_phase()?;
        self.feat_phase()?;
        self.spell_phase()?;
        self.finalize_phase()?;
        Ok(self.state)
    }

    /// Ask for `count` entries from `candidates` and check the answer.
    ///
    /// Nothing is asked when the candidates cannot cover more than the
    /// request; they are all taken, with a warning if they fall short.
    fn pick(
        &mut self,
        message: &str,
        candidates: Vec<String>,
        count: usize,
    ) -> MechResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if candidates.len() <= count {
            if candidates.len() < count {
                tracing::warn!(
                    message,
                    offered = candidates.len(),
                    wanted = count,
                    "fewer candidates than picks"
                );
            }
            return Ok(candidates);
        }
        let picked = self.prompt.choose(message, &candidates, count)?;
        check_selection(message, &candidates, count, &picked)?;
        Ok(picked)
    }

    /// Ask for exactly one entry.
    fn pick_one(&mut self, message: &str, candidates: Vec<String>) -> MechResult<String> {
        self.pick(message, candidates, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| MechError::ineligible(message, "nothing to choose from"))
    }
}

/// Verify a prompt answer: right size, only offered entries, and no entry
/// used more often than it was offered.
pub fn check_selection(
    message: &str,
    candidates: &[String],
    count: usize,
    picked: &[String],
) -> MechResult<()> {
    if picked.len() != count {
        return Err(MechError::ineligible(
            message,
            format!("expected {count} selections, got {}", picked.len()),
        ));
    }
    for choice in picked {
        let offered = candidates.iter().filter(|c| *c == choice).count();
        if offered == 0 {
            return Err(MechError::ineligible(
                message,
                format!("'{choice}' was not offered"),
            ));
        }
        if picked.iter().filter(|p| *p == choice).count() > offered {
            return Err(MechError::ineligible(
                message,
                format!("'{choice}' was chosen twice"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selection_accepts_offered() {
        let offered = strings(&["Arcana", "History", "Nature"]);
        assert!(check_selection("skills", &offered, 2, &strings(&["Nature", "Arcana"])).is_ok());
    }

    #[test]
    fn selection_rejects_wrong_count() {
        let offered = strings(&["Arcana", "History", "Nature"]);
        let err = check_selection("skills", &offered, 2, &strings(&["Arcana"])).unwrap_err();
        assert!(matches!(err, MechError::IneligibleChoice { .. }));
    }

    #[test]
    fn selection_rejects_unoffered() {
        let offered = strings(&["Arcana", "History", "Nature"]);
        assert!(check_selection("skills", &offered, 1, &strings(&["Stealth"])).is_err());
    }

    #[test]
    fn selection_rejects_duplicates() {
        let offered = strings(&["Arcana", "History", "Nature"]);
        assert!(check_selection("skills", &offered, 2, &strings(&["Arcana", "Arcana"])).is_err());
    }

    #[test]
    fn repeated_candidates_may_repeat() {
        let offered = strings(&["12", "12", "15"]);
        assert!(check_selection("scores", &offered, 2, &strings(&["12", "12"])).is_ok());
        assert!(check_selection("scores", &offered, 2, &strings(&["15", "15"])).is_err());
    }

    #[test]
    fn infeasible_threshold_rejected_up_front() {
        let srd = Srd::load().unwrap();
        let config = SessionConfig::default().with_threshold(120);
        let result = Session::new(&srd, crate::RandomPrompt::new(1), config);
        assert!(matches!(
            result,
            Err(MechError::InfeasibleThreshold { threshold: 120, .. })
        ));
    }
}
