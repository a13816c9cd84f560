//! Derived quantities: hit points, proficiency bonus, ability score
//! improvements and spell slots.

use indexmap::IndexMap;
use tasha_srd::{Ability, Srd};

use crate::eligibility::is_spellcaster;
use crate::error::{MechError, MechResult};
use crate::sheet::{CharacterState, ClassLevel, Field, Patch, Value};

/// Feature name that marks an ability score improvement.
pub const ASI_FEATURE: &str = "Ability Score Improvement";

/// Slot table indexed by effective caster level for multiclass characters.
pub const MULTICLASS_TABLE: &str = "full";

/// Highest character level.
pub const MAX_LEVEL: u32 = 20;

const FULL_CASTERS: &[&str] = &["Bard", "Cleric", "Druid", "Sorcerer", "Wizard"];
const HALF_CASTERS: &[&str] = &["Artificer", "Paladin", "Ranger"];
const THIRD_CASTERS: &[&str] = &["Fighter", "Rogue"];

/// `ceil(level / 4) + 1`.
pub fn proficiency_bonus(level: u32) -> u32 {
    level.div_ceil(4) + 1
}

/// Maximum hit points.
///
/// The first class taken gives its full hit die plus the Constitution
/// modifier at level one. Every other level of every class gives half the
/// die rounded up, plus one, plus the modifier.
pub fn hit_points(classes: &IndexMap<String, ClassLevel>, con_modifier: i32) -> MechResult<u32> {
    let mut iter = classes.values();
    let first = iter.next().ok_or(MechError::NoClasses)?;
    let per_level = |class: &ClassLevel| class.hit_die.div_ceil(2) as i32 + 1 + con_modifier;

    let mut total = first.hit_die as i32 + con_modifier;
    total += (first.level as i32 - 1).max(0) * per_level(first);
    for class in iter {
        total += class.level as i32 * per_level(class);
    }
    Ok(total.max(1) as u32)
}

/// How many times the primary class grants an ability score improvement
/// up to the character's total level.
pub fn allotted_asi(srd: &Srd, state: &CharacterState) -> MechResult<u32> {
    let (class, _) = state.primary_class().ok_or(MechError::NoClasses)?;
    let features = srd.class_features(class, state.total_level())?;
    Ok(features.iter().filter(|f| *f == ASI_FEATURE).count() as u32)
}

/// Weighted sum of class levels used for multiclass spell slots, capped at 20.
pub fn effective_caster_level(classes: &IndexMap<String, ClassLevel>) -> u32 {
    let level: u32 = classes
        .iter()
        .map(|(name, class)| {
            let name = name.as_str();
            if FULL_CASTERS.contains(&name) {
                class.level
            } else if HALF_CASTERS.contains(&name) {
                class.level.div_ceil(2)
            } else if THIRD_CASTERS.contains(&name) {
                class.level.div_ceil(3)
            } else {
                0
            }
        })
        .sum();
    level.min(MAX_LEVEL)
}

/// Slot table a single class casts from: its own, else its subclass's.
pub fn slot_table_for(srd: &Srd, class: &str, entry: &ClassLevel) -> MechResult<Option<String>> {
    if let Some(casting) = &srd.class(class)?.spellcasting {
        return Ok(Some(casting.slots.clone()));
    }
    let Some(subclass) = &entry.subclass else {
        return Ok(None);
    };
    Ok(srd
        .subclass(subclass)?
        .spellcasting
        .as_ref()
        .map(|casting| casting.slots.clone()))
}

/// Spell slots by spell level.
///
/// A single class reads its own table at its level. Several classes read
/// the shared table at their effective caster level.
pub fn spell_slots(srd: &Srd, classes: &IndexMap<String, ClassLevel>) -> MechResult<Vec<u32>> {
    match classes.len() {
        0 => Err(MechError::NoClasses),
        1 => {
            let Some((name, entry)) = classes.first() else {
                return Err(MechError::NoClasses);
            };
            match slot_table_for(srd, name, entry)? {
                Some(table) => Ok(srd.slots_at(&table, entry.level)?),
                None => Ok(Vec::new()),
            }
        }
        _ => Ok(srd.slots_at(MULTICLASS_TABLE, effective_caster_level(classes))?),
    }
}

/// Recompute every derived field through the merge operation. Characters
/// without a casting class or subclass get no spell slots.
pub fn finalize(srd: &Srd, state: &mut CharacterState) -> MechResult<()> {
    let (primary, _) = state.primary_class().ok_or(MechError::NoClasses)?;
    let allotted_skills = srd.class(primary)?.skill_count;
    let level = state.total_level();
    let hit_points = hit_points(&state.classes, state.modifier(Ability::Constitution))?;
    let slots = if is_spellcaster(srd, state)? {
        spell_slots(srd, &state.classes)?
    } else {
        Vec::new()
    };
    let asi = allotted_asi(srd, state)?;

    state.apply(Patch::Batch(vec![
        (Field::Level, Value::Number(level.into())),
        (
            Field::ProficiencyBonus,
            Value::Number(proficiency_bonus(level).into()),
        ),
        (
            Field::Initiative,
            Value::Number(state.modifier(Ability::Dexterity).into()),
        ),
        (Field::HitPoints, Value::Number(hit_points.into())),
        (Field::SpellSlots, Value::Slots(slots)),
        (Field::AllottedAsi, Value::Number(asi.into())),
        (Field::AllottedSkills, Value::Number(allotted_skills.into())),
    ]))?;
    tracing::info!(level, hit_points, "character finalized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(level: u32, hit_die: u32) -> ClassLevel {
        ClassLevel {
            level,
            subclass: None,
            hit_die,
        }
    }

    fn classes(entries: &[(&str, u32, u32)]) -> IndexMap<String, ClassLevel> {
        entries
            .iter()
            .map(|(name, level, hd)| (name.to_string(), class(*level, *hd)))
            .collect()
    }

    #[test]
    fn proficiency_by_level() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn hit_points_single_class() {
        let hp = hit_points(&classes(&[("Fighter", 5, 10)]), 2).unwrap();
        assert_eq!(hp, 44);
    }

    #[test]
    fn hit_points_level_one() {
        assert_eq!(hit_points(&classes(&[("Wizard", 1, 6)]), 1).unwrap(), 7);
    }

    #[test]
    fn secondary_classes_never_get_max_die() {
        let hp = hit_points(&classes(&[("Fighter", 1, 10), ("Barbarian", 1, 12)]), 0).unwrap();
        assert_eq!(hp, 10 + 7);
    }

    #[test]
    fn odd_hit_die_rounds_up() {
        let hp = hit_points(&classes(&[("Custom", 2, 7)]), 0).unwrap();
        assert_eq!(hp, 7 + 5);
    }

    #[test]
    fn hit_points_need_classes() {
        assert!(matches!(
            hit_points(&IndexMap::new(), 0),
            Err(MechError::NoClasses)
        ));
    }

    #[test]
    fn effective_level_weights() {
        assert_eq!(
            effective_caster_level(&classes(&[("Paladin", 4, 10), ("Sorcerer", 4, 6)])),
            6
        );
        assert_eq!(
            effective_caster_level(&classes(&[("Fighter", 4, 10), ("Wizard", 3, 6)])),
            5
        );
        assert_eq!(
            effective_caster_level(&classes(&[("Barbarian", 5, 12), ("Warlock", 5, 8)])),
            0
        );
    }

    #[test]
    fn multiclass_slots_use_effective_level() {
        let srd = Srd::load().unwrap();
        let slots =
            spell_slots(&srd, &classes(&[("Paladin", 4, 10), ("Sorcerer", 4, 6)])).unwrap();
        assert_eq!(slots, srd.slots_at("full", 6).unwrap());
        assert_eq!(slots, vec![4, 3, 3]);
    }

    #[test]
    fn single_class_slots_use_own_table() {
        let srd = Srd::load().unwrap();
        let warlock = spell_slots(&srd, &classes(&[("Warlock", 5, 8)])).unwrap();
        assert_eq!(warlock, srd.slots_at("pact", 5).unwrap());
        assert!(spell_slots(&srd, &classes(&[("Barbarian", 5, 12)]))
            .unwrap()
            .is_empty());
        assert!(spell_slots(&srd, &classes(&[("Paladin", 1, 10)]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn subclass_caster_uses_subclass_table() {
        let srd = Srd::load().unwrap();
        let mut fighter = classes(&[("Fighter", 3, 10)]);
        assert!(spell_slots(&srd, &fighter).unwrap().is_empty());
        fighter["Fighter"].subclass = Some("Eldritch Knight".to_string());
        assert_eq!(
            spell_slots(&srd, &fighter).unwrap(),
            srd.slots_at("third", 3).unwrap()
        );
    }

    #[test]
    fn asi_counted_from_primary_features() {
        let srd = Srd::load().unwrap();
        let mut state = CharacterState::new();
        state.classes = classes(&[("Wizard", 8, 6)]);
        assert_eq!(allotted_asi(&srd, &state).unwrap(), 2);
        state.classes = classes(&[("Wizard", 3, 6)]);
        assert_eq!(allotted_asi(&srd, &state).unwrap(), 0);
        state.classes = classes(&[("Fighter", 6, 10)]);
        assert_eq!(allotted_asi(&srd, &state).unwrap(), 2);
    }

    #[test]
    fn finalize_fills_derived_fields() {
        let srd = Srd::load().unwrap();
        let mut state = CharacterState::new();
        state.classes = classes(&[("Cleric", 5, 8)]);
        finalize(&srd, &mut state).unwrap();
        assert_eq!(state.level, 5);
        assert_eq!(state.proficiency_bonus, 3);
        assert_eq!(state.initiative, 0);
        assert_eq!(state.hit_points, 8 + 4 * 5);
        assert_eq!(state.spell_slots, vec![4, 3, 2]);
        assert_eq!(state.allotted_asi, 1);
        assert_eq!(state.allotted_skills, 2);
    }

    #[test]
    fn finalize_skips_slots_for_non_casters() {
        let srd = Srd::load().unwrap();
        let mut state = CharacterState::new();
        state.classes = classes(&[("Fighter", 3, 10), ("Barbarian", 2, 12)]);
        finalize(&srd, &mut state).unwrap();
        assert!(state.spell_slots.is_empty());

        state.classes["Fighter"].subclass = Some("Eldritch Knight".to_string());
        finalize(&srd, &mut state).unwrap();
        assert_eq!(state.spell_slots, vec![2]);
    }
}
