use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tasha_srd::{
    Category, ClassEntry, FeatEntry, FloorMode, Preparation, RuleEntry, Spellcasting, Srd,
};

pub fn run(category: &str, key: Option<&str>) -> Result<(), String> {
    let category: Category = category.parse()?;
    let srd = super::load_srd()?;

    let Some(key) = key else {
        let keys = srd.keys(category);
        for key in &keys {
            println!("  {key}");
        }
        println!();
        println!("  {} {} entries", keys.len(), category);
        return Ok(());
    };

    let entry = srd.lookup(category, key).map_err(|e| e.to_string())?;
    println!("  {} [{}]", key.bold(), entry.category().to_string().dimmed());
    println!();

    match entry {
        RuleEntry::Class(class) => print_class(&srd, key, class)?,
        RuleEntry::Subclass(subclass) => {
            println!("  class:      {}", subclass.class);
            print_list("armors", &subclass.armors);
            print_list("weapons", &subclass.weapons);
            print_list("tools", &subclass.tools);
            print_list("languages", &subclass.languages);
            print_list("skills", &subclass.skills);
            if let Some(casting) = &subclass.spellcasting {
                print_casting(casting);
            }
            print_features(&subclass.features);
        }
        RuleEntry::Multiclass(multi) => {
            let floors: Vec<_> = multi
                .requires
                .iter()
                .map(|(ability, min)| format!("{ability} {min}"))
                .collect();
            let joiner = match multi.mode {
                FloorMode::Any => " or ",
                FloorMode::All => " and ",
            };
            println!("  requires:   {}", floors.join(joiner));
            print_list("armors", &multi.armors);
            print_list("weapons", &multi.weapons);
            print_list("tools", &multi.tools);
            if multi.skill_count > 0 {
                println!("  skills:     choose {}", multi.skill_count);
            }
        }
        RuleEntry::Background(background) => {
            let abilities: Vec<_> = background.abilities.iter().map(|a| a.name()).collect();
            println!("  abilities:  {}", abilities.join(", "));
            println!("  feat:       {}", background.feat);
            print_list("skills", &background.skills);
            print_list("equipment", &background.equipment);
            println!("  gold:       {} gp", background.gold);
        }
        RuleEntry::Species(species) => {
            println!("  size:       {}", species.size);
            println!("  speed:      {} ft", species.speed);
            let bonus: Vec<_> = species
                .bonus
                .iter()
                .map(|(ability, n)| format!("{ability} {}", super::signed(*n)))
                .collect();
            print_list("bonus", &bonus);
            print_list("languages", &species.languages);
            print_list("skills", &species.skills);
            print_list("weapons", &species.weapons);
            print_list("resistances", &species.resistances);
            print_list("traits", &species.traits);
        }
        RuleEntry::Feat(feat) => print_feat(feat),
        RuleEntry::SpellList(list) => {
            for (level, spells) in list.levels.iter().enumerate() {
                if spells.is_empty() {
                    continue;
                }
                let label = if level == 0 {
                    "cantrips".to_string()
                } else {
                    format!("level {level}")
                };
                println!("  {} {}", format!("{label}:").dimmed(), spells.join(", "));
            }
        }
        RuleEntry::SlotTable(rows) => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Level", "Slots"]);
            for (i, row) in rows.iter().enumerate() {
                let slots: Vec<_> = row.iter().map(u32::to_string).collect();
                table.add_row(vec![(i + 1).to_string(), slots.join(" / ")]);
            }
            println!("{table}");
        }
        RuleEntry::Skill(ability) => println!("  ability:    {ability}"),
    }

    Ok(())
}

fn print_class(srd: &Srd, name: &str, class: &ClassEntry) -> Result<(), String> {
    println!("  hit die:    d{}", class.hit_die);
    let saves: Vec<_> = class.saving_throws.iter().map(|a| a.name()).collect();
    println!("  saves:      {}", saves.join(", "));
    print_list("armors", &class.armors);
    print_list("weapons", &class.weapons);
    print_list("tools", &class.tools);
    print_list("languages", &class.languages);
    println!(
        "  skills:     choose {} from {}",
        class.skill_count,
        class.skills.join(", ")
    );
    println!("  gold:       {} x {} gp", class.starting_gold, class.gold_multiplier);
    let subclasses = srd.subclasses_of(name).map_err(|e| e.to_string())?;
    println!(
        "  subclasses: {} (level {})",
        subclasses.join(", "),
        class.subclass_level
    );
    if let Some(casting) = &class.spellcasting {
        print_casting(casting);
    }
    print_features(&class.features);
    Ok(())
}

fn print_casting(casting: &Spellcasting) {
    let preparation = match casting.preparation {
        Preparation::Prepared => "prepared",
        Preparation::Known => "known",
    };
    println!(
        "  casting:    {} ({} list, {} slots, {preparation})",
        casting.ability, casting.list, casting.slots
    );
}

fn print_feat(feat: &FeatEntry) {
    println!("  category:   {}", feat.category);
    if feat.level > 1 {
        println!("  level:      {}", feat.level);
    }
    if !feat.ability.is_empty() {
        let floors: Vec<_> = feat
            .ability
            .iter()
            .map(|(ability, min)| format!("{ability} {min}"))
            .collect();
        println!("  requires:   {}", floors.join(" or "));
    }
    print_list("needs armor", &feat.requires_armors);
    print_list("needs one of", &feat.requires_features);
    if let Some(classes) = &feat.caster {
        println!("  caster:     {}", classes.join(", "));
    }
    print_list("armors", &feat.armors);
    print_list("weapons", &feat.weapons);
    print_list("tools", &feat.tools);
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("  {:<11} {}", format!("{label}:"), items.join(", "));
    }
}

fn print_features(features: &[Vec<String>]) {
    let levels: Vec<_> = features
        .iter()
        .enumerate()
        .filter(|(_, names)| !names.is_empty())
        .collect();
    if levels.is_empty() {
        return;
    }
    println!();
    println!("  {}", "Features:".dimmed());
    for (i, names) in levels {
        println!("  {:>4}  {}", i + 1, names.join(", "));
    }
}
