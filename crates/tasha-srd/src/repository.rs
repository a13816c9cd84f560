//! The loaded corpus and its query surface.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::ability::Ability;
use crate::category::{Category, RuleEntry};
use crate::entry::{
    BackgroundEntry, ClassEntry, FeatCategory, FeatEntry, Lists, MulticlassEntry, SpeciesEntry,
    SpellList, SubclassEntry,
};
use crate::error::{SrdError, SrdResult};

const CLASSES: &str = include_str!("../data/classes.toml");
const SUBCLASSES: &str = include_str!("../data/subclasses.toml");
const MULTICLASSES: &str = include_str!("../data/multiclasses.toml");
const BACKGROUNDS: &str = include_str!("../data/backgrounds.toml");
const SPECIES: &str = include_str!("../data/species.toml");
const FEATS: &str = include_str!("../data/feats.toml");
const SPELLS: &str = include_str!("../data/spells.toml");
const TABLES: &str = include_str!("../data/tables.toml");
const LISTS: &str = include_str!("../data/lists.toml");

/// The complete, immutable rules corpus.
#[derive(Debug, Clone)]
pub struct Srd {
    classes: BTreeMap<String, ClassEntry>,
    subclasses: BTreeMap<String, SubclassEntry>,
    multiclasses: BTreeMap<String, MulticlassEntry>,
    backgrounds: BTreeMap<String, BackgroundEntry>,
    species: BTreeMap<String, SpeciesEntry>,
    feats: BTreeMap<String, FeatEntry>,
    spells: BTreeMap<String, SpellList>,
    tables: BTreeMap<String, Vec<Vec<u32>>>,
    lists: Lists,
}

fn parse<T: DeserializeOwned>(file: &'static str, text: &str) -> SrdResult<T> {
    toml::from_str(text).map_err(|e| SrdError::Corpus {
        file,
        source: Box::new(e),
    })
}

fn get<'a, T>(map: &'a BTreeMap<String, T>, category: Category, key: &str) -> SrdResult<&'a T> {
    map.get(key)
        .ok_or_else(|| SrdError::not_found(category, key))
}

fn excluding(pool: &[String], known: &[String]) -> Vec<String> {
    pool.iter()
        .filter(|candidate| !known.contains(candidate))
        .cloned()
        .collect()
}

impl Srd {
    /// Parse and cross-check the embedded corpus.
    pub fn load() -> SrdResult<Self> {
        let srd = Self {
            classes: parse("classes.toml", CLASSES)?,
            subclasses: parse("subclasses.toml", SUBCLASSES)?,
            multiclasses: parse("multiclasses.toml", MULTICLASSES)?,
            backgrounds: parse("backgrounds.toml", BACKGROUNDS)?,
            species: parse("species.toml", SPECIES)?,
            feats: parse("feats.toml", FEATS)?,
            spells: parse("spells.toml", SPELLS)?,
            tables: parse("tables.toml", TABLES)?,
            lists: parse("lists.toml", LISTS)?,
        };
        srd.check_references()?;
        tracing::debug!(
            classes = srd.classes.len(),
            subclasses = srd.subclasses.len(),
            feats = srd.feats.len(),
            "rules corpus loaded"
        );
        Ok(srd)
    }

    fn check_references(&self) -> SrdResult<()> {
        let dangling = |file, entry: &str, category, reference: &str| SrdError::Dangling {
            file,
            entry: entry.to_string(),
            category,
            reference: reference.to_string(),
        };

        for (name, class) in &self.classes {
            if !self.multiclasses.contains_key(name) {
                return Err(dangling("classes.toml", name, Category::Multiclass, name));
            }
            if let Some(casting) = &class.spellcasting {
                if !self.spells.contains_key(&casting.list) {
                    return Err(dangling("classes.toml", name, Category::SpellList, &casting.list));
                }
                if !self.tables.contains_key(&casting.slots) {
                    return Err(dangling("classes.toml", name, Category::SlotTable, &casting.slots));
                }
            }
        }
        for (name, subclass) in &self.subclasses {
            if !self.classes.contains_key(&subclass.class) {
                return Err(dangling("subclasses.toml", name, Category::Class, &subclass.class));
            }
            if let Some(casting) = &subclass.spellcasting {
                if !self.spells.contains_key(&casting.list) {
                    return Err(dangling("subclasses.toml", name, Category::SpellList, &casting.list));
                }
                if !self.tables.contains_key(&casting.slots) {
                    return Err(dangling("subclasses.toml", name, Category::SlotTable, &casting.slots));
                }
            }
        }
        for (name, background) in &self.backgrounds {
            if !self.feats.contains_key(&background.feat) {
                return Err(dangling("backgrounds.toml", name, Category::Feat, &background.feat));
            }
        }
        Ok(())
    }

    /// Look up any entry by category and key.
    pub fn lookup(&self, category: Category, key: &str) -> SrdResult<RuleEntry<'_>> {
        Ok(match category {
            Category::Class => RuleEntry::Class(self.class(key)?),
            Category::Subclass => RuleEntry::Subclass(self.subclass(key)?),
            Category::Multiclass => RuleEntry::Multiclass(self.multiclass(key)?),
            Category::Background => RuleEntry::Background(self.background(key)?),
            Category::Species => RuleEntry::Species(self.species(key)?),
            Category::Feat => RuleEntry::Feat(self.feat(key)?),
            Category::SpellList => RuleEntry::SpellList(self.spell_list(key)?),
            Category::SlotTable => RuleEntry::SlotTable(self.slot_table(key)?),
            Category::Skill => RuleEntry::Skill(self.skill_ability(key)?),
        })
    }

    /// Every key in a category, sorted.
    pub fn keys(&self, category: Category) -> Vec<String> {
        match category {
            Category::Class => self.classes.keys().cloned().collect(),
            Category::Subclass => self.subclasses.keys().cloned().collect(),
            Category::Multiclass => self.multiclasses.keys().cloned().collect(),
            Category::Background => self.backgrounds.keys().cloned().collect(),
            Category::Species => self.species.keys().cloned().collect(),
            Category::Feat => self.feats.keys().cloned().collect(),
            Category::SpellList => self.spells.keys().cloned().collect(),
            Category::SlotTable => self.tables.keys().cloned().collect(),
            Category::Skill => self.lists.skills.keys().cloned().collect(),
        }
    }

    /// A class by name.
    pub fn class(&self, name: &str) -> SrdResult<&ClassEntry> {
        get(&self.classes, Category::Class, name)
    }

    /// A subclass by name.
    pub fn subclass(&self, name: &str) -> SrdResult<&SubclassEntry> {
        get(&self.subclasses, Category::Subclass, name)
    }

    /// Multiclassing rules for a class.
    pub fn multiclass(&self, name: &str) -> SrdResult<&MulticlassEntry> {
        get(&self.multiclasses, Category::Multiclass, name)
    }

    /// A background by name.
    pub fn background(&self, name: &str) -> SrdResult<&BackgroundEntry> {
        get(&self.backgrounds, Category::Background, name)
    }

    /// A species by name.
    pub fn species(&self, name: &str) -> SrdResult<&SpeciesEntry> {
        get(&self.species, Category::Species, name)
    }

    /// A feat by name.
    pub fn feat(&self, name: &str) -> SrdResult<&FeatEntry> {
        get(&self.feats, Category::Feat, name)
    }

    /// A spell list by name.
    pub fn spell_list(&self, name: &str) -> SrdResult<&SpellList> {
        get(&self.spells, Category::SpellList, name)
    }

    /// A slot progression by name.
    pub fn slot_table(&self, name: &str) -> SrdResult<&[Vec<u32>]> {
        get(&self.tables, Category::SlotTable, name).map(Vec::as_slice)
    }

    /// Slots by spell level for `table` at caster `level`.
    ///
    /// Level zero yields no slots; levels past the table repeat its last row.
    pub fn slots_at(&self, table: &str, level: u32) -> SrdResult<Vec<u32>> {
        let rows = self.slot_table(table)?;
        let Some(index) = (level as usize).checked_sub(1) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .get(index)
            .or(rows.last())
            .cloned()
            .unwrap_or_default())
    }

    /// The ability governing a skill.
    pub fn skill_ability(&self, skill: &str) -> SrdResult<Ability> {
        get(&self.lists.skills, Category::Skill, skill).copied()
    }

    /// Class names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        self.keys(Category::Class)
    }

    /// Background names, sorted.
    pub fn background_names(&self) -> Vec<String> {
        self.keys(Category::Background)
    }

    /// Species names, sorted.
    pub fn species_names(&self) -> Vec<String> {
        self.keys(Category::Species)
    }

    /// Subclasses owned by `class`.
    pub fn subclasses_of(&self, class: &str) -> SrdResult<Vec<String>> {
        self.class(class)?;
        Ok(self
            .subclasses
            .iter()
            .filter(|(_, sub)| sub.class == class)
            .map(|(name, _)| name.clone())
            .collect())
    }

    /// Features a class grants up to `level`, in level order.
    pub fn class_features(&self, class: &str, level: u32) -> SrdResult<Vec<String>> {
        Ok(self.class(class)?.features_up_to(level))
    }

    /// Features a subclass grants up to class `level`, in level order.
    pub fn subclass_features(&self, subclass: &str, level: u32) -> SrdResult<Vec<String>> {
        Ok(self.subclass(subclass)?.features_up_to(level))
    }

    /// Feats in one category, sorted by name.
    pub fn feats_in(&self, category: FeatCategory) -> Vec<String> {
        self.feats
            .iter()
            .filter(|(_, feat)| feat.category == category)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every feat with its entry.
    pub fn feats(&self) -> impl Iterator<Item = (&str, &FeatEntry)> {
        self.feats.iter().map(|(name, feat)| (name.as_str(), feat))
    }

    /// Skills not in `known`.
    pub fn skills_excluding(&self, known: &[String]) -> Vec<String> {
        self.lists
            .skills
            .keys()
            .filter(|skill| !known.contains(skill))
            .cloned()
            .collect()
    }

    /// Standard languages not in `known`.
    pub fn standard_languages_excluding(&self, known: &[String]) -> Vec<String> {
        excluding(&self.lists.standard_languages, known)
    }

    /// Tools not in `known`, limited to `prefixes` when any are given.
    pub fn tools_excluding(&self, known: &[String], prefixes: &[String]) -> Vec<String> {
        excluding(&self.lists.tools, known)
            .into_iter()
            .filter(|tool| prefixes.is_empty() || prefixes.iter().any(|p| tool.starts_with(p.as_str())))
            .collect()
    }

    /// Weapons not in `known`. Category names in `from` ("Simple",
    /// "Martial") expand to their lists; an empty `from` means every weapon.
    pub fn weapons_excluding(&self, known: &[String], from: &[String]) -> Vec<String> {
        let pool: Vec<String> = if from.is_empty() {
            self.lists
                .simple_weapons
                .iter()
                .chain(&self.lists.martial_weapons)
                .cloned()
                .collect()
        } else {
            from.iter()
                .flat_map(|name| match name.as_str() {
                    "Simple" => self.lists.simple_weapons.clone(),
                    "Martial" => self.lists.martial_weapons.clone(),
                    other => vec![other.to_string()],
                })
                .collect()
        };
        excluding(&pool, known)
    }

    /// Spells of `level` on `list` (level 0 = cantrips).
    pub fn spells(&self, list: &str, level: usize) -> SrdResult<&[String]> {
        Ok(self.spell_list(list)?.at(level))
    }

    /// Alignment names.
    pub fn alignments(&self) -> &[String] {
        &self.lists.alignments
    }

    /// Gender names.
    pub fn genders(&self) -> &[String] {
        &self.lists.genders
    }

    /// Shared enumerations.
    pub fn lists(&self) -> &Lists {
        &self.lists
    }
}
