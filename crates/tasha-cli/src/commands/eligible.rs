use std::collections::BTreeMap;

use colored::Colorize;

use tasha_mechanics::{eligible_feats, eligible_multiclasses};

use crate::store::CharacterStore;

pub fn run(store: &CharacterStore, name: &str) -> Result<(), String> {
    let state = store.load(name)?;
    let srd = super::load_srd()?;

    println!(
        "  {} [{}]",
        state.name.bold(),
        super::class_summary(&state).dimmed()
    );
    println!();

    let mut by_category: BTreeMap<_, Vec<String>> = BTreeMap::new();
    for feat in eligible_feats(&srd, &state) {
        let category = srd.feat(&feat).map_err(|e| e.to_string())?.category;
        by_category.entry(category).or_default().push(feat);
    }
    if by_category.is_empty() {
        println!("  {} (none)", "Feats:".dimmed());
    } else {
        println!("  {}", "Feats:".dimmed());
        for (category, feats) in &by_category {
            println!("    {category}: {}", feats.join(", "));
        }
    }

    println!();
    let classes = eligible_multiclasses(&srd, &state.classes, state.total_level(), &state.abilities)
        .map_err(|e| e.to_string())?;
    if classes.is_empty() {
        println!("  {} (none)", "Multiclass:".dimmed());
    } else {
        println!("  {} {}", "Multiclass:".dimmed(), classes.join(", "));
    }

    Ok(())
}
