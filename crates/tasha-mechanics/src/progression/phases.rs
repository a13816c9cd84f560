//! The ordered phases of a session.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tasha_srd::{Ability, Preparation, Spellcasting};

use super::Session;
use crate::ability::{AbilityScore, generate_scores};
use crate::derive::{self, MAX_LEVEL, allotted_asi};
use crate::dice::DiceExpr;
use crate::eligibility::{can_multiclass, eligible_feats, eligible_multiclasses, is_spellcaster};
use crate::error::{MechError, MechResult};
use crate::prompt::Prompt;
use crate::sheet::{ClassLevel, Field, MapValue, Value};

/// Background bonus split: +2 to one ability and +1 to another.
pub const SPLIT_TWO_ONE: &str = "+2/+1";
/// Background bonus split: +1 to each of the three abilities.
pub const SPLIT_EVEN: &str = "+1/+1/+1";
/// Improvement option: +2 to one ability.
pub const ASI_PLUS_TWO: &str = "+2 to one ability";
/// Improvement option: +1 to two abilities.
pub const ASI_PLUS_ONE: &str = "+1 to two abilities";
/// Improvement option: take a feat.
pub const ASI_FEAT: &str = "Feat";

fn names(abilities: impl IntoIterator<Item = Ability>) -> Vec<String> {
    abilities.into_iter().map(|a| a.name().to_string()).collect()
}

pub(super) fn parse_ability(message: &str, name: &str) -> MechResult<Ability> {
    name.parse()
        .map_err(|_| MechError::ineligible(message, format!("'{name}' is not an ability")))
}

impl<P: Prompt> Session<'_, P> {
    /// Phase 1: the primary class, its level and subclass.
    pub fn class_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "class", "entering phase");
        let srd = self.srd;
        let class = self.pick_one("Choose a primary class", srd.class_names())?;
        let level = self.pick_level(&class, MAX_LEVEL)?;
        self.take_class(&class, level, true)
    }

    /// Phase 2: background, its ability split and origin feat.
    pub fn background_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "background", "entering phase");
        let srd = self.srd;
        let name = self.pick_one("Choose a background", srd.background_names())?;
        let background = srd.background(&name)?;

        self.state.set(Field::Background, name.as_str())?;
        self.state.set(Field::Equipment, background.equipment.clone())?;
        self.state.set(Field::Skills, background.skills.clone())?;
        let gold = self.state.gold + background.gold;
        self.state.set(Field::Gold, Value::Number(gold.into()))?;
        for grant in &background.grants {
            self.apply_grant(grant)?;
        }

        let split = self.pick_one(
            "Choose how to split background ability bonuses",
            vec![SPLIT_TWO_ONE.to_string(), SPLIT_EVEN.to_string()],
        )?;
        if split == SPLIT_TWO_ONE {
            let message = "Choose an ability for +2";
            let major = self.pick_one(message, names(background.abilities.iter().copied()))?;
            let major = parse_ability(message, &major)?;
            let message = "Choose an ability for +1";
            let rest = background.abilities.iter().copied().filter(|a| *a != major);
            let minor = self.pick_one(message, names(rest))?;
            let minor = parse_ability(message, &minor)?;
            self.add_bonus(major, 2)?;
            self.add_bonus(minor, 1)?;
        } else {
            for ability in &background.abilities {
                self.add_bonus(*ability, 1)?;
            }
        }

        self.take_feat(&background.feat)
    }

    /// Phase 3: species traits, languages and species-specific choices.
    pub fn species_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "species", "entering phase");
        let srd = self.srd;
        let name = self.pick_one("Choose a species", srd.species_names())?;
        let species = srd.species(&name)?;

        self.state.set(Field::Species, name.as_str())?;
        self.state.set(Field::Size, species.size.as_str())?;
        self.state.set(Field::Speed, Value::Number(species.speed.into()))?;
        self.state.set(Field::Traits, species.traits.clone())?;

        self.state.set(Field::Languages, "Common")?;
        let languages = srd.standard_languages_excluding(&self.state.languages);
        let chosen = self.pick("Choose two languages", languages, 2)?;
        self.state.set(Field::Languages, chosen)?;
        self.state.set(Field::Languages, species.languages.clone())?;

        self.state.set(Field::Skills, species.skills.clone())?;
        self.state.set(Field::Weapons, species.weapons.clone())?;
        self.state.set(Field::Resistances, species.resistances.clone())?;
        for (ability, amount) in &species.bonus {
            self.add_bonus(*ability, *amount)?;
        }
        for grant in &species.grants {
            self.apply_grant(grant)?;
        }
        Ok(())
    }

    /// Phase 4: roll scores, assign them, then apply pending bonuses. The
    /// bonus map stays on the record and is never applied again.
    pub fn ability_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "abilities", "entering phase");
        let rolls = generate_scores(self.config.threshold, &mut self.rng)?;
        let mut remaining: Vec<String> = rolls.iter().map(u32::to_string).collect();
        let mut scores = BTreeMap::new();
        for ability in Ability::ALL {
            let message = format!("Assign a score to {ability}");
            let value = self.pick_one(&message, remaining.clone())?;
            if let Some(pos) = remaining.iter().position(|v| *v == value) {
                remaining.remove(pos);
            }
            let raw: u32 = value
                .parse()
                .map_err(|_| MechError::ineligible(&message, format!("'{value}' is not a score")))?;
            let bonus = self.state.bonus.get(&ability).copied().unwrap_or(0);
            scores.insert(ability, AbilityScore::new(raw).add(bonus));
        }
        self.state.set(Field::Abilities, MapValue::Abilities(scores))
    }

    /// Phase 5: add classes while the character qualifies and wants to.
    pub fn multiclass_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "multiclass", "entering phase");
        let srd = self.srd;
        loop {
            let level = self.state.total_level();
            if level >= MAX_LEVEL || !can_multiclass(srd, &self.state)? {
                return Ok(());
            }
            let options =
                eligible_multiclasses(srd, &self.state.classes, level, &self.state.abilities)?;
            if options.is_empty() || !self.prompt.confirm("Add another class?")? {
                return Ok(());
            }
            let class = self.pick_one("Choose a class to multiclass into", options)?;
            let levels = self.pick_level(&class, MAX_LEVEL - level)?;
            self.take_class(&class, levels, false)?;
        }
    }

    /// Phase 6: alignment and gender.
    pub fn details_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "details", "entering phase");
        let srd = self.srd;
        let alignment = self.pick_one("Choose an alignment", srd.alignments().to_vec())?;
        self.state.set(Field::Alignment, alignment)?;
        let gender = self.pick_one("Choose a gender", srd.genders().to_vec())?;
        self.state.set(Field::Gender, gender)
    }

    /// Phase 7: spend each ability score improvement on scores or a feat.
    pub fn feat_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "feats", "entering phase");
        let srd = self.srd;
        let slots = allotted_asi(srd, &self.state)?;
        for slot in 1..=slots {
            let raise_two = self.raisable(2);
            let raise_one = self.raisable(1);
            let feats = eligible_feats(srd, &self.state);

            let mut options = Vec::new();
            if !raise_two.is_empty() {
                options.push(ASI_PLUS_TWO.to_string());
            }
            if raise_one.len() >= 2 {
                options.push(ASI_PLUS_ONE.to_string());
            }
            if !feats.is_empty() {
                options.push(ASI_FEAT.to_string());
            }
            if options.is_empty() {
                tracing::warn!(slot, "no way to spend ability score improvement");
                continue;
            }

            let message = format!("Ability score improvement {slot} of {slots}");
            match self.pick_one(&message, options)?.as_str() {
                ASI_PLUS_TWO => {
                    let message = "Choose an ability for +2";
                    let choice = self.pick_one(message, names(raise_two))?;
                    self.add_bonus(parse_ability(message, &choice)?, 2)?;
                }
                ASI_PLUS_ONE => {
                    let message = "Choose two abilities for +1";
                    for choice in self.pick(message, names(raise_one), 2)? {
                        self.add_bonus(parse_ability(message, &choice)?, 1)?;
                    }
                }
                _ => {
                    let feat = self.pick_one("Choose a feat", feats)?;
                    self.take_feat(&feat)?;
                }
            }
        }
        Ok(())
    }

    /// Phase 8: cantrips and spells for each casting class.
    pub fn spell_phase(&mut self) -> MechResult<()> {
        let srd = self.srd;
        if !is_spellcaster(srd, &self.state)? {
            return Ok(());
        }
        tracing::info!(phase = "spells", "entering phase");
        let classes: Vec<(String, ClassLevel)> = self
            .state
            .classes
            .iter()
            .map(|(name, class)| (name.clone(), class.clone()))
            .collect();
        for (name, class) in classes {
            let Some(casting) = self.casting_for(&name, &class)? else {
                continue;
            };
            self.learn_spells(&name, class.level, &casting)?;
        }
        Ok(())
    }

    /// Phases 9 and 10: hit points and every other derived field.
    pub fn finalize_phase(&mut self) -> MechResult<()> {
        tracing::info!(phase = "finalize", "entering phase");
        derive::finalize(self.srd, &mut self.state)
    }

    fn pick_level(&mut self, class: &str, max: u32) -> MechResult<u32> {
        let message = format!("Choose a level for {class}");
        let levels = (1..=max).map(|level| level.to_string()).collect();
        let level = self.pick_one(&message, levels)?;
        level
            .parse()
            .map_err(|_| MechError::ineligible(&message, format!("'{level}' is not a level")))
    }

    fn take_class(&mut self, name: &str, level: u32, primary: bool) -> MechResult<()> {
        let srd = self.srd;
        let class = srd.class(name)?;
        let subclass = if level >= class.subclass_level {
            let options = srd.subclasses_of(name)?;
            Some(self.pick_one(&format!("Choose a {name} subclass"), options)?)
        } else {
            None
        };
        tracing::debug!(class = name, level, ?subclass, primary, "class taken");

        let entry = ClassLevel {
            level,
            subclass: subclass.clone(),
            hit_die: class.hit_die,
        };
        self.state.set(
            Field::Classes,
            MapValue::Classes(IndexMap::from([(name.to_string(), entry)])),
        )?;

        let skill_count;
        if primary {
            self.state.set(Field::Armors, class.armors.clone())?;
            self.state.set(Field::Weapons, class.weapons.clone())?;
            self.state.set(Field::Tools, class.tools.clone())?;
            self.state.set(Field::Languages, class.languages.clone())?;
            self.state
                .set(Field::SavingThrows, names(class.saving_throws.iter().copied()))?;
            let rolled = class
                .starting_gold
                .parse::<DiceExpr>()?
                .roll(&mut self.rng)
                .total();
            let gold = self.state.gold + rolled * class.gold_multiplier;
            self.state.set(Field::Gold, Value::Number(gold.into()))?;
            skill_count = class.skill_count;
            for grant in &class.grants {
                self.apply_grant(grant)?;
            }
        } else {
            let multiclass = srd.multiclass(name)?;
            self.state.set(Field::Armors, multiclass.armors.clone())?;
            self.state.set(Field::Weapons, multiclass.weapons.clone())?;
            self.state.set(Field::Tools, multiclass.tools.clone())?;
            skill_count = multiclass.skill_count;
            for grant in &multiclass.grants {
                self.apply_grant(grant)?;
            }
        }

        let skills: Vec<String> = class
            .skills
            .iter()
            .filter(|skill| !self.state.skills.contains(skill))
            .cloned()
            .collect();
        let chosen = self.pick(&format!("Choose {name} skills"), skills, skill_count as usize)?;
        self.state.set(Field::Skills, chosen)?;
        self.state
            .set(Field::Features, srd.class_features(name, level)?)?;

        if let Some(subclass) = subclass {
            let entry = srd.subclass(&subclass)?;
            self.state.set(Field::Armors, entry.armors.clone())?;
            self.state.set(Field::Weapons, entry.weapons.clone())?;
            self.state.set(Field::Tools, entry.tools.clone())?;
            self.state.set(Field::Languages, entry.languages.clone())?;
            self.state.set(Field::Skills, entry.skills.clone())?;
            self.state
                .set(Field::Features, srd.subclass_features(&subclass, level)?)?;
        }
        Ok(())
    }

    /// Abilities that can take `amount` without passing 20.
    fn raisable(&self, amount: u32) -> Vec<Ability> {
        Ability::ALL
            .into_iter()
            .filter(|a| self.state.score(*a).is_some_and(|s| s.can_raise(amount)))
            .collect()
    }

    fn casting_for(&self, class: &str, entry: &ClassLevel) -> MechResult<Option<Spellcasting>> {
        let srd = self.srd;
        if let Some(casting) = &srd.class(class)?.spellcasting {
            return Ok(Some(casting.clone()));
        }
        match &entry.subclass {
            Some(subclass) => Ok(srd.subclass(subclass)?.spellcasting.clone()),
            None => Ok(None),
        }
    }

    fn learn_spells(&mut self, class: &str, level: u32, casting: &Spellcasting) -> MechResult<()> {
        let srd = self.srd;

        let cantrip_count = casting.cantrips_at(level) as usize;
        if cantrip_count > 0 {
            let known = self.state.cantrips.get(class).cloned().unwrap_or_default();
            let pool: Vec<String> = srd
                .spells(&casting.list, 0)?
                .iter()
                .filter(|spell| !known.contains(spell))
                .cloned()
                .collect();
            let chosen = self.pick(&format!("Choose {class} cantrips"), pool, cantrip_count)?;
            self.state.set(
                Field::Cantrips,
                MapValue::Spells(BTreeMap::from([(class.to_string(), chosen)])),
            )?;
        }

        let slots = srd.slots_at(&casting.slots, level)?;
        let highest = slots.iter().rposition(|n| *n > 0).map_or(0, |i| i + 1);
        let spell_count = match casting.preparation {
            Preparation::Prepared => {
                (level as i32 + self.state.modifier(casting.ability)).max(1) as usize
            }
            Preparation::Known => casting.known_at(level) as usize,
        };
        if highest == 0 || spell_count == 0 {
            return Ok(());
        }

        let mut pool: Vec<String> = Vec::new();
        for spell_level in 1..=highest {
            for spell in srd.spells(&casting.list, spell_level)? {
                if !pool.contains(spell) {
                    pool.push(spell.clone());
                }
            }
        }
        let message = match casting.preparation {
            Preparation::Prepared => format!("Choose {class} spells to prepare"),
            Preparation::Known => format!("Choose {class} spells known"),
        };
        let chosen = self.pick(&message, pool, spell_count)?;
        tracing::debug!(class, cantrips = cantrip_count, spells = chosen.len(), "spells learned");
        self.state.set(
            Field::Spellcasting,
            MapValue::Spells(BTreeMap::from([(class.to_string(), chosen)])),
        )
    }
}
