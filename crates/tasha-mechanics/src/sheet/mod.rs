//! The character record under construction and its merge operation.
//!
//! Every rule outcome reaches a [`CharacterState`] through [`CharacterState::set`]
//! (or [`CharacterState::apply`] for several at once). The field's
//! [`FieldKind`] decides how the value lands: lists grow, mappings merge,
//! scalars are replaced. Mismatched shapes fail with
//! [`MechError::MalformedUpdate`] instead of being coerced.

pub mod field;

pub use field::{Field, FieldKind, MapKind, MapValue, Patch, Value};

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tasha_srd::Ability;

use crate::ability::AbilityScore;
use crate::error::{MechError, MechResult};

/// Levels held in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    /// Levels in this class.
    pub level: u32,
    /// Chosen subclass, once the class reaches its subclass level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
    /// Hit die size.
    pub hit_die: u32,
}

/// The character record. Scalars come first so the TOML form stays flat
/// ahead of its tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterState {
    /// Character name.
    pub name: String,
    /// Alignment.
    pub alignment: String,
    /// Background name.
    pub background: String,
    /// Species name.
    pub species: String,
    /// Gender.
    pub gender: String,
    /// Size category.
    pub size: String,
    /// Chosen draconic ancestry or fiendish legacy.
    pub ancestry: String,
    /// Walking speed in feet.
    pub speed: u32,
    /// Total character level.
    pub level: u32,
    /// Maximum hit points.
    pub hit_points: u32,
    /// Proficiency bonus.
    pub proficiency_bonus: u32,
    /// Initiative modifier.
    pub initiative: i32,
    /// Ability score improvements granted so far.
    pub allotted_asi: u32,
    /// Skill picks granted by the primary class.
    pub allotted_skills: u32,
    /// Gold pieces.
    pub gold: u32,
    /// Spell slots by spell level (index 0 is first level).
    pub spell_slots: Vec<u32>,
    /// Armor proficiencies.
    pub armors: Vec<String>,
    /// Weapon proficiencies.
    pub weapons: Vec<String>,
    /// Tool proficiencies.
    pub tools: Vec<String>,
    /// Known languages.
    pub languages: Vec<String>,
    /// Skill proficiencies.
    pub skills: Vec<String>,
    /// Saving throw proficiencies, by ability name.
    pub saving_throws: Vec<String>,
    /// Feats taken.
    pub feats: Vec<String>,
    /// Class, subclass and feat features.
    pub features: Vec<String>,
    /// Species traits.
    pub traits: Vec<String>,
    /// Damage resistances.
    pub resistances: Vec<String>,
    /// Starting equipment.
    pub equipment: Vec<String>,
    /// Ability scores.
    pub abilities: BTreeMap<Ability, AbilityScore>,
    /// Background and species bonuses gained before scores were rolled.
    /// Pending until the ability phase adds them to the scores, then kept
    /// as a record of what was added.
    pub bonus: BTreeMap<Ability, i32>,
    /// Classes in the order they were taken.
    pub classes: IndexMap<String, ClassLevel>,
    /// Cantrips known, by class.
    pub cantrips: BTreeMap<String, Vec<String>>,
    /// Spells known or prepared, by class.
    pub spellcasting: BTreeMap<String, Vec<String>>,
}

impl CharacterState {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and return to the empty record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Merge `value` into `field`.
    pub fn set(&mut self, field: Field, value: impl Into<Value>) -> MechResult<()> {
        let value = value.into();
        tracing::debug!(field = field.name(), value = value.describe(), "merge");
        match (field.kind(), value) {
            (FieldKind::Map(kind), Value::Map(map)) if map.kind() == kind => {
                self.merge_map(field, map)
            }
            (FieldKind::List, Value::List(items)) => {
                self.list_mut(field)?.extend(items);
                Ok(())
            }
            (FieldKind::List, Value::Text(item)) => {
                self.list_mut(field)?.push(item);
                Ok(())
            }
            (FieldKind::Text, Value::Text(text)) => {
                *self.text_mut(field)? = text;
                Ok(())
            }
            (FieldKind::Number, Value::Number(n)) => self.set_number(field, n),
            (FieldKind::Table, Value::Slots(slots)) => {
                self.spell_slots = slots;
                Ok(())
            }
            (kind, value) => Err(MechError::malformed(
                field.name(),
                format!("cannot apply {} to a {kind} field", value.describe()),
            )),
        }
    }

    /// Apply a single pair or a batch of pairs in order. A failing pair
    /// stops the batch; pairs before it stay applied.
    pub fn apply(&mut self, patch: Patch) -> MechResult<()> {
        match patch {
            Patch::Pair(field, value) => self.set(field, value),
            Patch::Batch(pairs) => pairs
                .into_iter()
                .try_for_each(|(field, value)| self.set(field, value)),
        }
    }

    /// Read a list field.
    pub fn list(&self, field: Field) -> Option<&[String]> {
        let list = match field {
            Field::Armors => &self.armors,
            Field::Weapons => &self.weapons,
            Field::Tools => &self.tools,
            Field::Languages => &self.languages,
            Field::Skills => &self.skills,
            Field::SavingThrows => &self.saving_throws,
            Field::Feats => &self.feats,
            Field::Features => &self.features,
            Field::Traits => &self.traits,
            Field::Resistances => &self.resistances,
            Field::Equipment => &self.equipment,
            _ => return None,
        };
        Some(list)
    }

    /// Sum of all class levels.
    pub fn total_level(&self) -> u32 {
        self.classes.values().map(|class| class.level).sum()
    }

    /// The first class taken.
    pub fn primary_class(&self) -> Option<(&str, &ClassLevel)> {
        self.classes
            .first()
            .map(|(name, class)| (name.as_str(), class))
    }

    /// Current score for an ability, if rolled.
    pub fn score(&self, ability: Ability) -> Option<AbilityScore> {
        self.abilities.get(&ability).copied()
    }

    /// Current modifier for an ability, 0 before scores are rolled.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.score(ability).map_or(0, |s| s.modifier)
    }

    /// Whether `name` appears among the character's features.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }

    fn merge_map(&mut self, field: Field, map: MapValue) -> MechResult<()> {
        match (field, map) {
            (Field::Abilities, MapValue::Abilities(scores)) => self.abilities.extend(
                scores
                    .into_iter()
                    .map(|(ability, s)| (ability, AbilityScore::new(s.score))),
            ),
            (Field::Bonus, MapValue::Bonus(bonus)) => self.bonus.extend(bonus),
            (Field::Classes, MapValue::Classes(classes)) => self.classes.extend(classes),
            (Field::Cantrips, MapValue::Spells(spells)) => self.cantrips.extend(spells),
            (Field::Spellcasting, MapValue::Spells(spells)) => self.spellcasting.extend(spells),
            (field, _) => return Err(MechError::malformed(field.name(), "not a map field")),
        }
        Ok(())
    }

    fn list_mut(&mut self, field: Field) -> MechResult<&mut Vec<String>> {
        Ok(match field {
            Field::Armors => &mut self.armors,
            Field::Weapons => &mut self.weapons,
            Field::Tools => &mut self.tools,
            Field::Languages => &mut self.languages,
            Field::Skills => &mut self.skills,
            Field::SavingThrows => &mut self.saving_throws,
            Field::Feats => &mut self.feats,
            Field::Features => &mut self.features,
            Field::Traits => &mut self.traits,
            Field::Resistances => &mut self.resistances,
            Field::Equipment => &mut self.equipment,
            field => return Err(MechError::malformed(field.name(), "not a list field")),
        })
    }

    fn text_mut(&mut self, field: Field) -> MechResult<&mut String> {
        Ok(match field {
            Field::Name => &mut self.name,
            Field::Alignment => &mut self.alignment,
            Field::Background => &mut self.background,
            Field::Species => &mut self.species,
            Field::Gender => &mut self.gender,
            Field::Size => &mut self.size,
            Field::Ancestry => &mut self.ancestry,
            field => return Err(MechError::malformed(field.name(), "not a text field")),
        })
    }

    fn set_number(&mut self, field: Field, n: i64) -> MechResult<()> {
        if field == Field::Initiative {
            self.initiative = i32::try_from(n)
                .map_err(|_| MechError::malformed(field.name(), format!("{n} is out of range")))?;
            return Ok(());
        }
        let n = u32::try_from(n)
            .map_err(|_| MechError::malformed(field.name(), format!("{n} is out of range")))?;
        let slot = match field {
            Field::Speed => &mut self.speed,
            Field::Level => &mut self.level,
            Field::HitPoints => &mut self.hit_points,
            Field::ProficiencyBonus => &mut self.proficiency_bonus,
            Field::AllottedAsi => &mut self.allotted_asi,
            Field::AllottedSkills => &mut self.allotted_skills,
            Field::Gold => &mut self.gold,
            field => return Err(MechError::malformed(field.name(), "not a number field")),
        };
        *slot = n;
        Ok(())
    }
}
