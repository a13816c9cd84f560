//! Field identifiers and update values for the character merge operation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use tasha_srd::Ability;

use crate::ability::AbilityScore;
use crate::error::{MechError, MechResult};

use super::ClassLevel;

/// Shape of a mapping field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    /// Ability name to score.
    Abilities,
    /// Ability name to pending bonus.
    Bonus,
    /// Class name to level and subclass.
    Classes,
    /// Class name to spell names.
    Spells,
}

/// How a field merges incoming values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Overwritten by text.
    Text,
    /// Overwritten by a number.
    Number,
    /// Extended by lists, appended to by text.
    List,
    /// Deep-merged by a mapping of the same kind.
    Map(MapKind),
    /// Spell slots by spell level, overwritten.
    Table,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::List => write!(f, "list"),
            Self::Map(_) => write!(f, "map"),
            Self::Table => write!(f, "table"),
        }
    }
}

macro_rules! fields {
    ($($variant:ident => $name:literal, $kind:expr;)*) => {
        /// Every mutable field of a [`super::CharacterState`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $(
                #[doc = concat!("The `", $name, "` field.")]
                $variant,
            )*
        }

        impl Field {
            /// All fields in record order.
            pub const ALL: &[Field] = &[$(Field::$variant),*];

            /// The snake_case field name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// How this field merges.
            pub fn kind(self) -> FieldKind {
                match self {
                    $(Self::$variant => $kind,)*
                }
            }
        }
    };
}

fields! {
    Name => "name", FieldKind::Text;
    Alignment => "alignment", FieldKind::Text;
    Background => "background", FieldKind::Text;
    Species => "species", FieldKind::Text;
    Gender => "gender", FieldKind::Text;
    Size => "size", FieldKind::Text;
    Ancestry => "ancestry", FieldKind::Text;
    Speed => "speed", FieldKind::Number;
    Level => "level", FieldKind::Number;
    HitPoints => "hit_points", FieldKind::Number;
    ProficiencyBonus => "proficiency_bonus", FieldKind::Number;
    Initiative => "initiative", FieldKind::Number;
    AllottedAsi => "allotted_asi", FieldKind::Number;
    AllottedSkills => "allotted_skills", FieldKind::Number;
    Gold => "gold", FieldKind::Number;
    SpellSlots => "spell_slots", FieldKind::Table;
    Armors => "armors", FieldKind::List;
    Weapons => "weapons", FieldKind::List;
    Tools => "tools", FieldKind::List;
    Languages => "languages", FieldKind::List;
    Skills => "skills", FieldKind::List;
    SavingThrows => "saving_throws", FieldKind::List;
    Feats => "feats", FieldKind::List;
    Features => "features", FieldKind::List;
    Traits => "traits", FieldKind::List;
    Resistances => "resistances", FieldKind::List;
    Equipment => "equipment", FieldKind::List;
    Abilities => "abilities", FieldKind::Map(MapKind::Abilities);
    Bonus => "bonus", FieldKind::Map(MapKind::Bonus);
    Classes => "classes", FieldKind::Map(MapKind::Classes);
    Cantrips => "cantrips", FieldKind::Map(MapKind::Spells);
    Spellcasting => "spellcasting", FieldKind::Map(MapKind::Spells);
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| MechError::malformed(s, "no such field"))
    }
}

/// A mapping value, one variant per [`MapKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    /// Scores to set.
    Abilities(BTreeMap<Ability, AbilityScore>),
    /// Bonuses to set.
    Bonus(BTreeMap<Ability, i32>),
    /// Class entries to set.
    Classes(IndexMap<String, ClassLevel>),
    /// Spell lists to set.
    Spells(BTreeMap<String, Vec<String>>),
}

impl MapValue {
    /// The kind of mapping this value fits.
    pub fn kind(&self) -> MapKind {
        match self {
            Self::Abilities(_) => MapKind::Abilities,
            Self::Bonus(_) => MapKind::Bonus,
            Self::Classes(_) => MapKind::Classes,
            Self::Spells(_) => MapKind::Spells,
        }
    }
}

/// A value handed to the merge operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single string.
    Text(String),
    /// A single integer.
    Number(i64),
    /// A sequence of strings.
    List(Vec<String>),
    /// A mapping.
    Map(MapValue),
    /// Spell slots by spell level.
    Slots(Vec<u32>),
}

impl Value {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "a number",
            Self::List(_) => "a list",
            Self::Map(_) => "a map",
            Self::Slots(_) => "spell slots",
        }
    }

    /// Parse command-line text into a value fitting `field`.
    ///
    /// List fields split on commas and slot tables parse comma-separated
    /// counts. Mapping fields have no text form.
    pub fn parse(field: Field, raw: &str) -> MechResult<Self> {
        let items = || {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
        };
        match field.kind() {
            FieldKind::Text => Ok(Self::Text(raw.trim().to_string())),
            FieldKind::Number => raw
                .trim()
                .parse()
                .map(Self::Number)
                .map_err(|_| MechError::malformed(field.name(), format!("'{raw}' is not a number"))),
            FieldKind::List => Ok(Self::List(items().map(str::to_string).collect())),
            FieldKind::Table => items()
                .map(|item| {
                    item.parse::<u32>().map_err(|_| {
                        MechError::malformed(field.name(), format!("'{item}' is not a slot count"))
                    })
                })
                .collect::<MechResult<Vec<_>>>()
                .map(Self::Slots),
            FieldKind::Map(_) => Err(MechError::malformed(
                field.name(),
                "map fields cannot be set from text",
            )),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<MapValue> for Value {
    fn from(map: MapValue) -> Self {
        Self::Map(map)
    }
}

/// One call to [`super::CharacterState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// A single field update.
    Pair(Field, Value),
    /// Several updates applied in order.
    Batch(Vec<(Field, Value)>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), *field);
        }
        assert_eq!("Hit Points".parse::<Field>().unwrap(), Field::HitPoints);
        assert_eq!("spell-slots".parse::<Field>().unwrap(), Field::SpellSlots);
    }

    #[test]
    fn unknown_field_is_malformed() {
        let err = "charm".parse::<Field>().unwrap_err();
        assert!(matches!(err, MechError::MalformedUpdate { ref field, .. } if field == "charm"));
    }

    #[test]
    fn field_kinds() {
        assert_eq!(Field::Languages.kind(), FieldKind::List);
        assert_eq!(Field::Speed.kind(), FieldKind::Number);
        assert_eq!(Field::Classes.kind(), FieldKind::Map(MapKind::Classes));
        assert_eq!(Field::SpellSlots.kind(), FieldKind::Table);
    }

    #[test]
    fn parse_by_kind() {
        assert_eq!(
            Value::parse(Field::Alignment, " Lawful Good ").unwrap(),
            Value::from("Lawful Good")
        );
        assert_eq!(Value::parse(Field::Speed, "35").unwrap(), Value::Number(35));
        assert_eq!(
            Value::parse(Field::Languages, "Elvish, Orc,").unwrap(),
            Value::List(vec!["Elvish".to_string(), "Orc".to_string()])
        );
        assert_eq!(
            Value::parse(Field::SpellSlots, "4,3,2").unwrap(),
            Value::Slots(vec![4, 3, 2])
        );
    }

    #[test]
    fn parse_rejects_bad_text() {
        assert!(Value::parse(Field::Speed, "fast").is_err());
        assert!(Value::parse(Field::SpellSlots, "4,x").is_err());
        assert!(Value::parse(Field::Abilities, "Strength=10").is_err());
    }
}
