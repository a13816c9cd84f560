//! The six ability scores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six abilities, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ability {
    /// Physical power.
    Strength,
    /// Agility and reflexes.
    Dexterity,
    /// Stamina and health.
    Constitution,
    /// Reasoning and memory.
    Intelligence,
    /// Perception and insight.
    Wisdom,
    /// Force of personality.
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Full name, e.g. "Strength".
    pub fn name(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }

    /// Three-letter abbreviation, e.g. "STR".
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ability {
    type Err = String;

    /// Accepts full names and abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s) || a.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown ability: \"{s}\""))
    }
}

impl TryFrom<String> for Ability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ability> for String {
    fn from(ability: Ability) -> Self {
        ability.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names_and_abbreviations() {
        assert_eq!("Strength".parse::<Ability>(), Ok(Ability::Strength));
        assert_eq!("wisdom".parse::<Ability>(), Ok(Ability::Wisdom));
        assert_eq!("CHA".parse::<Ability>(), Ok(Ability::Charisma));
        assert!("Luck".parse::<Ability>().is_err());
    }

    #[test]
    fn sheet_order() {
        let mut shuffled = vec![Ability::Charisma, Ability::Strength, Ability::Wisdom];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Ability::Strength, Ability::Wisdom, Ability::Charisma]
        );
    }

    #[test]
    fn display_uses_full_name() {
        assert_eq!(Ability::Intelligence.to_string(), "Intelligence");
        assert_eq!(Ability::Dexterity.abbreviation(), "DEX");
    }
}
