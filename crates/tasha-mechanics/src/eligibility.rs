//! Feat prerequisites and multiclass eligibility.
//!
//! Ability floors on feats are satisfied by any one listed ability, armor
//! requirements need every listed armor, and feature requirements need any
//! one listed feature. Multiclass floors follow the entry's mode.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tasha_srd::{Ability, FeatEntry, FloorMode, MulticlassEntry, Srd};

use crate::ability::AbilityScore;
use crate::derive::MAX_LEVEL;
use crate::error::MechResult;
use crate::sheet::{CharacterState, ClassLevel};

fn meets(abilities: &BTreeMap<Ability, AbilityScore>, ability: Ability, minimum: i32) -> bool {
    abilities
        .get(&ability)
        .is_some_and(|score| score.score as i32 >= minimum)
}

fn holds_all(held: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| held.contains(w))
}

/// Whether the character is a spellcaster: a class with its own casting,
/// or a subclass that adds casting.
pub fn is_spellcaster(srd: &Srd, state: &CharacterState) -> MechResult<bool> {
    for (name, class) in &state.classes {
        if srd.class(name)?.spellcasting.is_some() {
            return Ok(true);
        }
        if let Some(subclass) = &class.subclass {
            if srd.subclass(subclass)?.spellcasting.is_some() {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Check a feat entry against the character.
pub fn feat_allowed(state: &CharacterState, name: &str, feat: &FeatEntry) -> bool {
    if state.feats.iter().any(|held| held == name) {
        return false;
    }
    if !feat.ability.is_empty()
        && !feat
            .ability
            .iter()
            .any(|(ability, minimum)| meets(&state.abilities, *ability, *minimum))
    {
        return false;
    }
    if !holds_all(&state.armors, &feat.requires_armors) {
        return false;
    }
    if !feat.requires_features.is_empty()
        && !feat.requires_features.iter().any(|f| state.has_feature(f))
    {
        return false;
    }
    if state.total_level() < feat.level {
        return false;
    }
    if let Some(casters) = &feat.caster {
        if !casters.iter().any(|class| state.classes.contains_key(class)) {
            return false;
        }
    }
    // Pure proficiency grants the character already has.
    let grants_proficiency = !feat.armors.is_empty() || !feat.weapons.is_empty();
    if grants_proficiency
        && holds_all(&state.armors, &feat.armors)
        && holds_all(&state.weapons, &feat.weapons)
    {
        return false;
    }
    true
}

/// Whether the character may take `feat`.
pub fn meets_feat_requirements(srd: &Srd, state: &CharacterState, feat: &str) -> MechResult<bool> {
    Ok(feat_allowed(state, feat, srd.feat(feat)?))
}

/// Every feat the character may take, sorted by name.
pub fn eligible_feats(srd: &Srd, state: &CharacterState) -> Vec<String> {
    srd.feats()
        .filter(|(name, feat)| feat_allowed(state, name, feat))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Whether `abilities` satisfy a multiclass floor.
pub fn floor_met(entry: &MulticlassEntry, abilities: &BTreeMap<Ability, AbilityScore>) -> bool {
    let mut checks = entry
        .requires
        .iter()
        .map(|(ability, minimum)| meets(abilities, *ability, *minimum));
    match entry.mode {
        FloorMode::Any => checks.any(|ok| ok),
        FloorMode::All => checks.all(|ok| ok),
    }
}

/// Whether every class already held meets its own multiclass floor.
pub fn can_multiclass(srd: &Srd, state: &CharacterState) -> MechResult<bool> {
    for name in state.classes.keys() {
        if !floor_met(srd.multiclass(name)?, &state.abilities) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Classes not yet held whose floor is met. Empty at level 20.
pub fn eligible_multiclasses(
    srd: &Srd,
    held: &IndexMap<String, ClassLevel>,
    level: u32,
    abilities: &BTreeMap<Ability, AbilityScore>,
) -> MechResult<Vec<String>> {
    if level >= MAX_LEVEL {
        return Ok(Vec::new());
    }
    let mut eligible = Vec::new();
    for name in srd.class_names() {
        if held.contains_key(&name) {
            continue;
        }
        if floor_met(srd.multiclass(&name)?, abilities) {
            eligible.push(name);
        }
    }
    Ok(eligible)
}
