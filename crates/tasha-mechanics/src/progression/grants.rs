//! Resolution of grant descriptors and feats.

use std::collections::BTreeMap;

use tasha_srd::{Ability, Grant};

use super::Session;
use crate::error::MechResult;
use crate::prompt::Prompt;
use crate::sheet::{Field, MapValue, Value};

const SKILL: &str = "Skill";
const TOOL: &str = "Tool";

fn excluding(pool: &[String], known: &[String]) -> Vec<String> {
    pool.iter()
        .filter(|item| !known.contains(item))
        .cloned()
        .collect()
}

impl<P: Prompt> Session<'_, P> {
    /// Resolve one grant descriptor against the record.
    pub(super) fn apply_grant(&mut self, grant: &Grant) -> MechResult<()> {
        let srd = self.srd;
        tracing::debug!(?grant, "applying grant");
        match grant {
            Grant::Languages { count, from } => {
                let pool = if from.is_empty() {
                    srd.standard_languages_excluding(&self.state.languages)
                } else {
                    excluding(from, &self.state.languages)
                };
                let chosen = self.pick("Choose languages", pool, *count as usize)?;
                self.state.set(Field::Languages, chosen)
            }
            Grant::Skills { count, from } => {
                let pool = if from.is_empty() {
                    srd.skills_excluding(&self.state.skills)
                } else {
                    excluding(from, &self.state.skills)
                };
                let chosen = self.pick("Choose skills", pool, *count as usize)?;
                self.state.set(Field::Skills, chosen)
            }
            Grant::Tools {
                count,
                from,
                prefixes,
            } => {
                let pool = if from.is_empty() {
                    srd.tools_excluding(&self.state.tools, prefixes)
                } else {
                    excluding(from, &self.state.tools)
                };
                let chosen = self.pick("Choose tools", pool, *count as usize)?;
                self.state.set(Field::Tools, chosen)
            }
            Grant::Weapons { count, from } => {
                let pool = srd.weapons_excluding(&self.state.weapons, from);
                let chosen = self.pick("Choose weapons", pool, *count as usize)?;
                self.state.set(Field::Weapons, chosen)
            }
            Grant::AbilityBonus {
                amount,
                count,
                from,
                saving_throw,
            } => self.grant_ability_bonus(*amount, *count as usize, from, *saving_throw),
            Grant::SkillOrTool { count } => {
                for _ in 0..*count {
                    let kind = self.pick_one(
                        "Choose a skill or a tool",
                        vec![SKILL.to_string(), TOOL.to_string()],
                    )?;
                    if kind == SKILL {
                        let pool = srd.skills_excluding(&self.state.skills);
                        let chosen = self.pick("Choose a skill", pool, 1)?;
                        self.state.set(Field::Skills, chosen)?;
                    } else {
                        let pool = srd.tools_excluding(&self.state.tools, &[]);
                        let chosen = self.pick("Choose a tool", pool, 1)?;
                        self.state.set(Field::Tools, chosen)?;
                    }
                }
                Ok(())
            }
            Grant::Features { names } => self.state.set(Field::Features, names.clone()),
            Grant::Speed { bonus } => {
                let speed = self.state.speed + bonus;
                self.state.set(Field::Speed, Value::Number(speed.into()))
            }
            Grant::Ancestry { label, options } => {
                let message = format!("Choose a {label}");
                let choice = self.pick_one(&message, options.keys().cloned().collect())?;
                let resistance = options.get(&choice).cloned().unwrap_or_default();
                self.state.set(Field::Ancestry, choice)?;
                self.state.set(Field::Resistances, resistance)
            }
            Grant::Spells {
                lists,
                cantrips,
                first_level,
            } => {
                let list = self.pick_one("Choose a spell list", lists.clone())?;
                let pool = excluding(srd.spells(&list, 0)?, &self.state.features);
                let chosen = self.pick("Choose cantrips", pool, *cantrips as usize)?;
                self.state.set(Field::Features, chosen)?;
                let pool = excluding(srd.spells(&list, 1)?, &self.state.features);
                let chosen = self.pick("Choose level 1 spells", pool, *first_level as usize)?;
                self.state.set(Field::Features, chosen)
            }
        }
    }

    fn grant_ability_bonus(
        &mut self,
        amount: i32,
        count: usize,
        from: &[Ability],
        saving_throw: bool,
    ) -> MechResult<()> {
        let mut pool: Vec<Ability> = if from.is_empty() {
            Ability::ALL.to_vec()
        } else {
            from.to_vec()
        };
        if saving_throw {
            pool.retain(|a| !self.state.saving_throws.iter().any(|s| s == a.name()));
        }
        let raisable: Vec<Ability> = pool
            .iter()
            .copied()
            .filter(|a| {
                self.state
                    .score(*a)
                    .is_none_or(|s| s.can_raise(amount.unsigned_abs()))
            })
            .collect();
        if !raisable.is_empty() {
            pool = raisable;
        }

        let message = format!("Choose abilities for +{amount}");
        let candidates = pool.iter().map(|a| a.name().to_string()).collect();
        for choice in self.pick(&message, candidates, count)? {
            let ability = super::phases::parse_ability(&message, &choice)?;
            self.add_bonus(ability, amount)?;
            if saving_throw {
                self.state.set(Field::SavingThrows, ability.name())?;
            }
        }
        Ok(())
    }

    /// Raise a score once rolled; before that, add to the pending bonus.
    pub(super) fn add_bonus(&mut self, ability: Ability, amount: i32) -> MechResult<()> {
        match self.state.score(ability) {
            Some(score) => self.state.set(
                Field::Abilities,
                MapValue::Abilities(BTreeMap::from([(ability, score.add(amount))])),
            ),
            None => {
                let pending = self.state.bonus.get(&ability).copied().unwrap_or(0) + amount;
                self.state.set(
                    Field::Bonus,
                    MapValue::Bonus(BTreeMap::from([(ability, pending)])),
                )
            }
        }
    }

    /// Take a feat: record it, add its fixed proficiencies, resolve its grants.
    pub(super) fn take_feat(&mut self, name: &str) -> MechResult<()> {
        let srd = self.srd;
        let feat = srd.feat(name)?;
        tracing::debug!(feat = name, "feat taken");
        self.state.set(Field::Feats, name)?;
        self.state.set(Field::Armors, feat.armors.clone())?;
        self.state.set(Field::Weapons, feat.weapons.clone())?;
        self.state.set(Field::Tools, feat.tools.clone())?;
        for grant in &feat.grants {
            self.apply_grant(grant)?;
        }
        Ok(())
    }
}
