//! Integration tests for character progression sessions.

use std::collections::VecDeque;

use tasha_mechanics::{
    CharacterState, MechError, Prompt, PromptError, RandomPrompt, Session, SessionConfig, modifier,
};
use tasha_srd::{Ability, Srd};

/// Answers scripted messages, assigns the highest remaining roll to each
/// ability, and otherwise takes the first candidates offered.
#[derive(Default)]
struct Scripted {
    answers: Vec<(&'static str, Vec<&'static str>)>,
    confirms: VecDeque<bool>,
}

impl Scripted {
    fn answer(mut self, message: &'static str, picks: &[&'static str]) -> Self {
        self.answers.push((message, picks.to_vec()));
        self
    }

    fn confirms(mut self, answers: &[bool]) -> Self {
        self.confirms.extend(answers);
        self
    }
}

impl Prompt for Scripted {
    fn choose(
        &mut self,
        message: &str,
        candidates: &[String],
        count: usize,
    ) -> Result<Vec<String>, PromptError> {
        if let Some(pos) = self
            .answers
            .iter()
            .position(|(key, _)| message.contains(key))
        {
            let (_, picks) = self.answers.remove(pos);
            return Ok(picks.iter().map(|s| s.to_string()).collect());
        }
        if message.starts_with("Assign a score") {
            let best = candidates
                .iter()
                .max_by_key(|c| c.parse::<u32>().unwrap_or(0))
                .cloned();
            return Ok(best.into_iter().collect());
        }
        Ok(candidates.iter().take(count).cloned().collect())
    }

    fn confirm(&mut self, _message: &str) -> Result<bool, PromptError> {
        Ok(self.confirms.pop_front().unwrap_or(false))
    }
}

/// Input that ends immediately.
struct Closed;

impl Prompt for Closed {
    fn choose(&mut self, _: &str, _: &[String], _: usize) -> Result<Vec<String>, PromptError> {
        Err(PromptError::Closed)
    }

    fn confirm(&mut self, _: &str) -> Result<bool, PromptError> {
        Err(PromptError::Closed)
    }
}

fn config(seed: u64) -> SessionConfig {
    SessionConfig::default().with_seed(seed)
}

fn build(srd: &Srd, prompt: Scripted, seed: u64) -> CharacterState {
    Session::new(srd, prompt, config(seed))
        .unwrap()
        .run("Tester")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn wizard_prepares_spells_by_level_and_intelligence() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a primary class", &["Wizard"])
        .answer("Choose a level for Wizard", &["5"])
        .answer("Choose a Wizard subclass", &["Evoker"])
        .answer("Choose a background", &["Sage"]);
    let state = build(&srd, prompt, 7);

    assert_eq!(state.name, "Tester");
    assert_eq!(state.level, 5);
    assert_eq!(state.proficiency_bonus, 3);
    assert_eq!(state.classes["Wizard"].subclass.as_deref(), Some("Evoker"));
    assert_eq!(state.spell_slots, vec![4, 3, 2]);
    assert_eq!(state.saving_throws, vec!["Intelligence", "Wisdom"]);

    let con = state.modifier(Ability::Constitution);
    assert_eq!(state.hit_points as i32, 6 + con + 4 * (4 + con));

    assert_eq!(state.cantrips["Wizard"].len(), 4);
    let prepared = (5 + state.modifier(Ability::Intelligence)).max(1) as usize;
    assert_eq!(state.spellcasting["Wizard"].len(), prepared);
    let castable: Vec<&String> = (1..=3)
        .flat_map(|level| srd.spells("Wizard", level).unwrap())
        .collect();
    assert!(state.spellcasting["Wizard"].iter().all(|s| castable.contains(&s)));

    assert!(state.feats.contains(&"Magic Initiate".to_string()));
    assert_eq!(state.allotted_asi, 1);
}

#[test]
fn fighter_multiclasses_into_barbarian() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a primary class", &["Fighter"])
        .answer("Choose a level for Fighter", &["3"])
        .answer("Choose a Fighter subclass", &["Champion"])
        .answer("Choose a class to multiclass into", &["Barbarian"])
        .answer("Choose a level for Barbarian", &["2"])
        .confirms(&[true, false]);
    let state = build(&srd, prompt, 11);

    let classes: Vec<&str> = state.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, ["Fighter", "Barbarian"]);
    assert_eq!(state.classes["Barbarian"].level, 2);
    assert_eq!(state.classes["Barbarian"].subclass, None);
    assert_eq!(state.level, 5);

    let con = state.modifier(Ability::Constitution);
    assert_eq!(state.hit_points as i32, 10 + con + 2 * (6 + con) + 2 * (7 + con));

    // Multiclass entries grant no saving throws and repeat proficiencies.
    assert_eq!(state.saving_throws, vec!["Constitution", "Strength"]);
    assert_eq!(state.armors.iter().filter(|a| *a == "Shield").count(), 2);
    assert!(state.spell_slots.is_empty());
    assert!(state.spellcasting.is_empty());
}

#[test]
fn level_twenty_never_multiclasses() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a primary class", &["Bard"])
        .answer("Choose a level for Bard", &["20"])
        .confirms(&[true, true, true]);
    let state = build(&srd, prompt, 3);
    assert_eq!(state.classes.len(), 1);
    assert_eq!(state.level, 20);
    assert_eq!(state.proficiency_bonus, 6);
}

#[test]
fn dragonborn_ancestry_grants_resistance() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a species", &["Dragonborn"])
        .answer("Choose a draconic ancestry", &["Red"]);
    let state = build(&srd, prompt, 5);
    assert_eq!(state.species, "Dragonborn");
    assert_eq!(state.ancestry, "Red");
    assert!(state.resistances.contains(&"Fire".to_string()));
}

#[test]
fn random_characters_hold_invariants() {
    let srd = Srd::load().unwrap();
    for seed in 0..30 {
        let session = Session::new(&srd, RandomPrompt::new(seed), config(seed)).unwrap();
        let state = session.run("Random").unwrap();

        let level: u32 = state.classes.values().map(|c| c.level).sum();
        assert_eq!(state.level, level, "seed {seed}");
        assert!((1..=20).contains(&level), "seed {seed}");
        assert_eq!(state.proficiency_bonus, level.div_ceil(4) + 1);
        assert_eq!(state.abilities.len(), 6);
        for score in state.abilities.values() {
            assert!((1..=20).contains(&score.score), "seed {seed}");
            assert_eq!(score.modifier, modifier(score.score));
        }
        assert_eq!(state.initiative, state.modifier(Ability::Dexterity));
        assert!(state.hit_points >= 1);
        assert!(state.languages.contains(&"Common".to_string()));
        assert!(!state.feats.is_empty());
        for feat in &state.feats {
            assert!(srd.feat(feat).is_ok(), "seed {seed}: {feat}");
        }
    }
}

#[test]
fn same_seed_same_character() {
    let srd = Srd::load().unwrap();
    let a = Session::new(&srd, RandomPrompt::new(42), config(42))
        .unwrap()
        .run("Twin")
        .unwrap();
    let b = Session::new(&srd, RandomPrompt::new(42), config(42))
        .unwrap()
        .run("Twin")
        .unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Individual phases
// ---------------------------------------------------------------------------

#[test]
fn background_split_accumulates_pending_bonus() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a background", &["Sage"])
        .answer("split background ability bonuses", &["+2/+1"])
        .answer("Choose an ability for +2", &["Intelligence"])
        .answer("Choose an ability for +1", &["Wisdom"]);
    let mut session = Session::new(&srd, prompt, config(1)).unwrap();
    session.class_phase().unwrap();
    session.background_phase().unwrap();

    let state = session.state();
    assert_eq!(state.bonus.get(&Ability::Intelligence), Some(&2));
    assert_eq!(state.bonus.get(&Ability::Wisdom), Some(&1));
    assert_eq!(state.bonus.len(), 2);
    assert_eq!(state.feats, vec!["Magic Initiate"]);
    assert!(state.gold >= 8);
}

#[test]
fn species_bonus_stacks_and_lands_on_scores() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default()
        .answer("Choose a background", &["Acolyte"])
        .answer("split background ability bonuses", &["+1/+1/+1"])
        .answer("Choose a species", &["Half-Elf"])
        .answer("Choose abilities for +1", &["Wisdom", "Strength"]);
    let mut session = Session::new(&srd, prompt, config(2)).unwrap();
    session.class_phase().unwrap();
    session.background_phase().unwrap();
    session.species_phase().unwrap();

    let acolyte = srd.background("Acolyte").unwrap();
    let expected_wis = 1 + i32::from(acolyte.abilities.contains(&Ability::Wisdom));
    assert_eq!(session.state().bonus.get(&Ability::Wisdom), Some(&expected_wis));
    assert_eq!(session.state().bonus.get(&Ability::Charisma), Some(&3));

    let pending = session.state().bonus.clone();
    session.ability_phase().unwrap();
    for (ability, bonus) in &pending {
        let score = session.state().score(*ability).unwrap();
        assert!(score.score as i32 >= 8 + bonus || score.score == 20);
    }
    // Kept as a record; later phases never add it a second time.
    assert_eq!(session.state().bonus, pending);
    let rolled = session.state().abilities.clone();
    session.details_phase().unwrap();
    session.finalize_phase().unwrap();
    assert_eq!(session.state().abilities, rolled);
}

#[test]
fn species_languages_start_with_common() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default().answer("Choose a species", &["Elf"]);
    let mut session = Session::new(&srd, prompt, config(4)).unwrap();
    session.species_phase().unwrap();
    let languages = &session.state().languages;
    assert_eq!(languages[0], "Common");
    assert_eq!(languages.len(), 3);
    assert_eq!(session.state().skills.len(), 1);
}

#[test]
fn reset_discards_progress() {
    let srd = Srd::load().unwrap();
    let mut session = Session::new(&srd, Scripted::default(), config(9)).unwrap();
    session.class_phase().unwrap();
    assert!(!session.state().classes.is_empty());
    session.reset();
    assert_eq!(session.state(), &CharacterState::new());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unoffered_answer_is_ineligible() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default().answer("Choose a primary class", &["Necromancer"]);
    let err = Session::new(&srd, prompt, config(1))
        .unwrap()
        .run("Liar")
        .unwrap_err();
    assert!(matches!(err, MechError::IneligibleChoice { .. }));
}

#[test]
fn wrong_count_is_ineligible() {
    let srd = Srd::load().unwrap();
    let prompt = Scripted::default().answer("Choose a primary class", &["Bard", "Cleric"]);
    let err = Session::new(&srd, prompt, config(1))
        .unwrap()
        .run("Greedy")
        .unwrap_err();
    assert!(matches!(err, MechError::IneligibleChoice { .. }));
}

#[test]
fn closed_input_aborts_session() {
    let srd = Srd::load().unwrap();
    let err = Session::new(&srd, Closed, config(1))
        .unwrap()
        .run("Nobody")
        .unwrap_err();
    assert!(matches!(err, MechError::Prompt(PromptError::Closed)));
}
