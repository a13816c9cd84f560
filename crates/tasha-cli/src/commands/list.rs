use comfy_table::{ContentArrangement, Table};

use crate::store::CharacterStore;

pub fn run(store: &CharacterStore) -> Result<(), String> {
    let characters = store.list()?;

    if characters.is_empty() {
        println!("  No characters found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Species", "Background", "Classes", "Level"]);

    for character in &characters {
        table.add_row(vec![
            character.name.clone(),
            character.species.clone(),
            character.background.clone(),
            super::class_summary(character),
            character.level.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", characters.len());

    Ok(())
}
