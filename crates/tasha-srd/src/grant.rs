//! Grant descriptors: the data form of every rule that asks the player for
//! a sub-choice or hands out a fixed bonus.
//!
//! Backgrounds, species, classes, multiclass entries and feats all carry a
//! list of grants. The progression engine resolves each one through a single
//! dispatcher, so a new rule entry never needs new control flow.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::ability::Ability;

/// A single grant, tagged by `kind` in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Grant {
    /// Choose languages; an empty `from` means any standard language.
    Languages {
        /// How many to choose.
        count: u32,
        /// Candidate pool.
        #[serde(default)]
        from: Vec<String>,
    },
    /// Choose skills; an empty `from` means any skill.
    Skills {
        /// How many to choose.
        count: u32,
        /// Candidate pool.
        #[serde(default)]
        from: Vec<String>,
    },
    /// Choose tools from a list or from every tool with a given prefix.
    Tools {
        /// How many to choose.
        count: u32,
        /// Explicit candidates.
        #[serde(default)]
        from: Vec<String>,
        /// Tool name prefixes such as "Musical Instrument".
        #[serde(default)]
        prefixes: Vec<String>,
    },
    /// Choose weapons. "Simple" and "Martial" in `from` expand to their
    /// weapon lists; an empty `from` means any weapon.
    Weapons {
        /// How many to choose.
        count: u32,
        /// Candidate pool.
        #[serde(default)]
        from: Vec<String>,
    },
    /// Raise `count` distinct abilities by `amount`.
    AbilityBonus {
        /// Points added to each chosen ability.
        amount: i32,
        /// How many abilities to choose.
        count: u32,
        /// Candidate abilities; empty means all six.
        #[serde(default)]
        from: Vec<Ability>,
        /// Also grant the chosen ability's saving throw, offering only
        /// abilities whose save is not yet proficient.
        #[serde(default)]
        saving_throw: bool,
    },
    /// Repeatedly choose between a skill and a tool.
    SkillOrTool {
        /// How many picks.
        count: u32,
    },
    /// Fixed features.
    Features {
        /// Feature names appended as-is.
        names: Vec<String>,
    },
    /// Walking speed increase.
    Speed {
        /// Feet added.
        bonus: u32,
    },
    /// Choose a lineage whose value is a damage resistance.
    Ancestry {
        /// What the choice is called, for prompting.
        label: String,
        /// Lineage name to resistance.
        options: BTreeMap<String, String>,
    },
    /// Choose a spell list, then cantrips and first-level spells from it.
    Spells {
        /// Spell lists to choose between.
        lists: Vec<String>,
        /// Cantrips to learn.
        cantrips: u32,
        /// First-level spells to learn.
        first_level: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        grants: Vec<Grant>,
    }

    #[test]
    fn deserialize_tagged_grants() {
        let holder: Holder = toml::from_str(
            r#"
            grants = [
                { kind = "languages", count = 2 },
                { kind = "tools", count = 1, prefixes = ["Gaming Set"] },
                { kind = "ability_bonus", amount = 1, count = 1, saving_throw = true },
                { kind = "ancestry", label = "legacy", options = { Infernal = "Fire" } },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(
            holder.grants[0],
            Grant::Languages {
                count: 2,
                from: vec![]
            }
        );
        assert!(matches!(
            &holder.grants[1],
            Grant::Tools { prefixes, .. } if prefixes == &["Gaming Set".to_string()]
        ));
        assert!(matches!(
            holder.grants[2],
            Grant::AbilityBonus {
                saving_throw: true,
                ..
            }
        ));
        assert!(matches!(&holder.grants[3], Grant::Ancestry { options, .. } if options["Infernal"] == "Fire"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Holder, _> = toml::from_str(r#"grants = [{ kind = "wings" }]"#);
        assert!(result.is_err());
    }
}
