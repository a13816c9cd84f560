//! Corpus categories and borrowed lookup results.

use std::fmt;
use std::str::FromStr;

use crate::entry::{
    BackgroundEntry, ClassEntry, FeatEntry, MulticlassEntry, SpeciesEntry, SpellList,
    SubclassEntry,
};

/// A top-level section of the rules corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Base classes.
    Class,
    /// Subclasses, each owned by one class.
    Subclass,
    /// Multiclassing floors and grants.
    Multiclass,
    /// Character backgrounds.
    Background,
    /// Playable species.
    Species,
    /// Feats.
    Feat,
    /// Spell lists keyed by class or subclass.
    SpellList,
    /// Spell slot progressions.
    SlotTable,
    /// Skills.
    Skill,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Class,
        Category::Subclass,
        Category::Multiclass,
        Category::Background,
        Category::Species,
        Category::Feat,
        Category::SpellList,
        Category::SlotTable,
        Category::Skill,
    ];

    /// Singular human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Subclass => "subclass",
            Self::Multiclass => "multiclass",
            Self::Background => "background",
            Self::Species => "species",
            Self::Feat => "feat",
            Self::SpellList => "spell list",
            Self::SlotTable => "slot table",
            Self::Skill => "skill",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "class" | "classes" => Ok(Self::Class),
            "subclass" | "subclasses" => Ok(Self::Subclass),
            "multiclass" | "multiclasses" => Ok(Self::Multiclass),
            "background" | "backgrounds" => Ok(Self::Background),
            "species" | "race" | "races" => Ok(Self::Species),
            "feat" | "feats" => Ok(Self::Feat),
            "spells" | "spell-list" | "spell-lists" => Ok(Self::SpellList),
            "slots" | "slot-table" | "slot-tables" => Ok(Self::SlotTable),
            "skill" | "skills" => Ok(Self::Skill),
            other => Err(format!(
                "unknown category: \"{other}\". Use: classes, subclasses, multiclasses, \
                 backgrounds, species, feats, spells, slots, skills"
            )),
        }
    }
}

/// A borrowed view of one corpus entry, as returned by [`crate::Srd::lookup`].
#[derive(Debug, Clone, Copy)]
pub enum RuleEntry<'a> {
    /// A class definition.
    Class(&'a ClassEntry),
    /// A subclass definition.
    Subclass(&'a SubclassEntry),
    /// A multiclassing entry.
    Multiclass(&'a MulticlassEntry),
    /// A background definition.
    Background(&'a BackgroundEntry),
    /// A species definition.
    Species(&'a SpeciesEntry),
    /// A feat definition.
    Feat(&'a FeatEntry),
    /// A spell list.
    SpellList(&'a SpellList),
    /// A slot progression, one row per caster level.
    SlotTable(&'a [Vec<u32>]),
    /// A skill and its governing ability.
    Skill(crate::Ability),
}

impl RuleEntry<'_> {
    /// The category this entry belongs to.
    pub fn category(&self) -> Category {
        match self {
            Self::Class(_) => Category::Class,
            Self::Subclass(_) => Category::Subclass,
            Self::Multiclass(_) => Category::Multiclass,
            Self::Background(_) => Category::Background,
            Self::Species(_) => Category::Species,
            Self::Feat(_) => Category::Feat,
            Self::SpellList(_) => Category::SpellList,
            Self::SlotTable(_) => Category::SlotTable,
            Self::Skill(_) => Category::Skill,
        }
    }
}
