//! Typed corpus entries, deserialized from the embedded TOML documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::ability::Ability;
use crate::grant::Grant;

/// How many spells a caster has ready at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preparation {
    /// Class level plus casting modifier, minimum one.
    Prepared,
    /// Fixed count from the known-spells progression.
    Known,
}

/// Spellcasting rules attached to a class or subclass.
#[derive(Debug, Clone, Deserialize)]
pub struct Spellcasting {
    /// Ability used for spell attacks and prepared counts.
    pub ability: Ability,
    /// Name of the spell list in `spells.toml`.
    pub list: String,
    /// Name of the slot progression in `tables.toml`.
    pub slots: String,
    /// Prepared or known caster.
    pub preparation: Preparation,
    /// Cantrips known per class level.
    #[serde(default)]
    pub cantrips: Vec<u32>,
    /// Spells known per class level (known casters only).
    #[serde(default)]
    pub known: Vec<u32>,
}

impl Spellcasting {
    /// Cantrips known at the given class level.
    pub fn cantrips_at(&self, level: u32) -> u32 {
        progression(&self.cantrips, level)
    }

    /// Spells known at the given class level.
    pub fn known_at(&self, level: u32) -> u32 {
        progression(&self.known, level)
    }
}

/// Reads a per-level progression; levels past the end repeat the last row.
fn progression(table: &[u32], level: u32) -> u32 {
    let Some(index) = (level as usize).checked_sub(1) else {
        return 0;
    };
    table.get(index).or(table.last()).copied().unwrap_or(0)
}

/// Concatenates per-level feature rows up to and including `level`.
pub(crate) fn accumulate(rows: &[Vec<String>], level: u32) -> Vec<String> {
    rows.iter()
        .take(level as usize)
        .flat_map(|row| row.iter().cloned())
        .collect()
}

fn default_gold_multiplier() -> u32 {
    10
}

/// A base class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassEntry {
    /// Sides on the class hit die.
    pub hit_die: u32,
    /// Saving throw proficiencies granted to a first class.
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    /// Armor proficiencies.
    #[serde(default)]
    pub armors: Vec<String>,
    /// Weapon proficiencies.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Fixed tool proficiencies.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Fixed languages.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Skills the class may choose from.
    pub skills: Vec<String>,
    /// Number of skills chosen as a first class.
    pub skill_count: u32,
    /// Class level at which a subclass is chosen.
    pub subclass_level: u32,
    /// Dice expression for starting gold, e.g. `5d4`.
    pub starting_gold: String,
    /// Multiplier applied to the starting gold roll.
    #[serde(default = "default_gold_multiplier")]
    pub gold_multiplier: u32,
    /// Choices granted to a first class.
    #[serde(default)]
    pub grants: Vec<Grant>,
    /// Spellcasting rules, if the class casts.
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
    /// Features per class level; row `n` is level `n + 1`.
    pub features: Vec<Vec<String>>,
}

impl ClassEntry {
    /// Every feature gained up to `level`, in level order.
    pub fn features_up_to(&self, level: u32) -> Vec<String> {
        accumulate(&self.features, level)
    }
}

/// A subclass.
#[derive(Debug, Clone, Deserialize)]
pub struct SubclassEntry {
    /// The class this subclass belongs to.
    pub class: String,
    /// Extra armor proficiencies.
    #[serde(default)]
    pub armors: Vec<String>,
    /// Extra weapon proficiencies.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Extra tool proficiencies.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Extra languages.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Extra skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Spellcasting rules for third casters.
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
    /// Features per class level; row `n` is level `n + 1`.
    pub features: Vec<Vec<String>>,
}

impl SubclassEntry {
    /// Every feature gained up to `level`, in level order.
    pub fn features_up_to(&self, level: u32) -> Vec<String> {
        accumulate(&self.features, level)
    }
}

/// Whether an ability floor needs one or all of its minimums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorMode {
    /// Any single listed minimum suffices.
    #[default]
    Any,
    /// Every listed minimum must be met.
    All,
}

/// Multiclassing rules for one class.
#[derive(Debug, Clone, Deserialize)]
pub struct MulticlassEntry {
    /// Minimum scores required to enter or leave the class.
    pub requires: BTreeMap<Ability, i32>,
    /// How `requires` combines.
    #[serde(default)]
    pub mode: FloorMode,
    /// Armor proficiencies gained by multiclassing in.
    #[serde(default)]
    pub armors: Vec<String>,
    /// Weapon proficiencies gained by multiclassing in.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Tool proficiencies gained by multiclassing in.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Skills chosen from the class list.
    #[serde(default)]
    pub skill_count: u32,
    /// Extra choices.
    #[serde(default)]
    pub grants: Vec<Grant>,
}

/// A background.
#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundEntry {
    /// The three abilities the background bonus may raise.
    pub abilities: Vec<Ability>,
    /// Origin feat granted by the background.
    pub feat: String,
    /// Skill proficiencies.
    pub skills: Vec<String>,
    /// Starting equipment.
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Starting gold pieces.
    #[serde(default)]
    pub gold: u32,
    /// Tool and bonus choices, resolved in order.
    #[serde(default)]
    pub grants: Vec<Grant>,
}

/// A playable species.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesEntry {
    /// Size category.
    pub size: String,
    /// Walking speed in feet.
    pub speed: u32,
    /// Named traits.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Languages beyond Common and the standard picks.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Fixed skill proficiencies.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Fixed weapon proficiencies.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Damage resistances.
    #[serde(default)]
    pub resistances: Vec<String>,
    /// Fixed ability bonuses.
    #[serde(default)]
    pub bonus: BTreeMap<Ability, i32>,
    /// Species-specific choices.
    #[serde(default)]
    pub grants: Vec<Grant>,
}

/// Feat grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum FeatCategory {
    /// Granted by backgrounds at first level.
    Origin,
    /// Available through ability score improvements.
    General,
    /// Requires the Fighting Style feature.
    #[serde(rename = "Fighting Style")]
    FightingStyle,
    /// Nineteenth-level boons.
    #[serde(rename = "Epic Boon")]
    EpicBoon,
}

impl fmt::Display for FeatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Origin => "Origin",
            Self::General => "General",
            Self::FightingStyle => "Fighting Style",
            Self::EpicBoon => "Epic Boon",
        })
    }
}

/// A feat and its prerequisites.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatEntry {
    /// Feat grouping.
    pub category: FeatCategory,
    /// Minimum total character level.
    pub level: u32,
    /// Ability minimums; any one suffices.
    #[serde(default)]
    pub ability: BTreeMap<Ability, i32>,
    /// Armor proficiencies that must all be held.
    #[serde(default)]
    pub requires_armors: Vec<String>,
    /// Features of which at least one must be held.
    #[serde(default)]
    pub requires_features: Vec<String>,
    /// Classes of which the character must be a spellcaster.
    #[serde(default)]
    pub caster: Option<Vec<String>>,
    /// Armor proficiencies granted.
    #[serde(default)]
    pub armors: Vec<String>,
    /// Weapon proficiencies granted.
    #[serde(default)]
    pub weapons: Vec<String>,
    /// Tool proficiencies granted.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Enhancement choices.
    #[serde(default)]
    pub grants: Vec<Grant>,
}

/// A spell list; `levels[0]` holds cantrips.
#[derive(Debug, Clone, Deserialize)]
pub struct SpellList {
    /// Spells per spell level.
    pub levels: Vec<Vec<String>>,
}

impl SpellList {
    /// Spells of the given level, empty past the end of the list.
    pub fn at(&self, level: usize) -> &[String] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Shared enumerations from `lists.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Lists {
    /// Alignment names.
    pub alignments: Vec<String>,
    /// Gender names.
    pub genders: Vec<String>,
    /// Languages any character may learn.
    pub standard_languages: Vec<String>,
    /// Languages granted only by specific rules.
    pub rare_languages: Vec<String>,
    /// Armor proficiency names.
    pub armors: Vec<String>,
    /// Tool proficiency names.
    pub tools: Vec<String>,
    /// Simple weapons.
    pub simple_weapons: Vec<String>,
    /// Martial weapons.
    pub martial_weapons: Vec<String>,
    /// Skill name to governing ability.
    pub skills: BTreeMap<String, Ability>,
}
