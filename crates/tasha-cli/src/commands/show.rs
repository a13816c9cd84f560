use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tasha_mechanics::{CharacterState, Field};
use tasha_srd::Ability;

use crate::store::CharacterStore;

const LIST_SECTIONS: &[(&str, Field)] = &[
    ("saving throws", Field::SavingThrows),
    ("skills", Field::Skills),
    ("languages", Field::Languages),
    ("armors", Field::Armors),
    ("weapons", Field::Weapons),
    ("tools", Field::Tools),
    ("feats", Field::Feats),
    ("traits", Field::Traits),
    ("resistances", Field::Resistances),
    ("equipment", Field::Equipment),
    ("features", Field::Features),
];

pub fn run(store: &CharacterStore, name: &str, json: bool) -> Result<(), String> {
    let state = store.load(name)?;

    if json {
        let text = serde_json::to_string_pretty(&state)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    print_sheet(&state);
    Ok(())
}

fn print_sheet(state: &CharacterState) {
    // Header
    println!(
        "  {} [{} {}]",
        state.name.bold(),
        state.species.dimmed(),
        state.background.dimmed()
    );
    println!("  {}", super::class_summary(state));
    println!();

    if !state.alignment.is_empty() {
        println!("  alignment:   {}", state.alignment);
    }
    if !state.gender.is_empty() {
        println!("  gender:      {}", state.gender);
    }
    if !state.ancestry.is_empty() {
        println!("  ancestry:    {}", state.ancestry);
    }
    println!("  size:        {}", state.size);
    println!("  speed:       {} ft", state.speed);
    println!("  level:       {}", state.level);
    println!("  hit points:  {}", state.hit_points);
    println!("  proficiency: +{}", state.proficiency_bonus);
    println!("  initiative:  {}", super::signed(state.initiative));
    println!("  gold:        {} gp", state.gold);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ability", "Score", "Modifier", "Save"]);
    for ability in Ability::ALL {
        let (score, modifier) = match state.score(ability) {
            Some(s) => (s.score.to_string(), super::signed(s.modifier)),
            None => ("—".to_string(), "—".to_string()),
        };
        let proficient = state.saving_throws.iter().any(|s| s == ability.name());
        table.add_row(vec![
            ability.name().to_string(),
            score,
            modifier,
            if proficient { "✓" } else { "" }.to_string(),
        ]);
    }
    println!("{table}");

    for (label, field) in LIST_SECTIONS {
        if let Some(items) = state.list(*field).filter(|items| !items.is_empty()) {
            println!("  {}: {}", label.dimmed(), items.join(", "));
        }
    }

    if !state.spell_slots.is_empty() {
        println!();
        let slots: Vec<_> = state
            .spell_slots
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(i, n)| format!("{}: {n}", ordinal(i + 1)))
            .collect();
        println!("  {} {}", "spell slots:".dimmed(), slots.join(", "));
    }
    for (class, cantrips) in &state.cantrips {
        println!("  {} {}", format!("{class} cantrips:").dimmed(), cantrips.join(", "));
    }
    for (class, spells) in &state.spellcasting {
        println!("  {} {}", format!("{class} spells:").dimmed(), spells.join(", "));
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
