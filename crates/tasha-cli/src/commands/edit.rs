use tasha_mechanics::derive::finalize;
use tasha_mechanics::{Field, Value};

use crate::store::CharacterStore;

pub fn run(store: &CharacterStore, name: &str, field: &str, raw: &str) -> Result<(), String> {
    let mut state = store.load(name)?;
    let srd = super::load_srd()?;

    let field: Field = field.parse().map_err(|e: tasha_mechanics::MechError| e.to_string())?;
    let value = Value::parse(field, raw).map_err(|e| e.to_string())?;
    let old_name = state.name.clone();
    state.set(field, value).map_err(|e| e.to_string())?;
    if state.name.trim().is_empty() {
        return Err("character name cannot be empty".into());
    }
    let renamed = CharacterStore::file_name(&old_name) != CharacterStore::file_name(&state.name);
    if renamed && store.exists(&state.name) {
        return Err(format!("character already exists: \"{}\"", state.name));
    }
    finalize(&srd, &mut state).map_err(|e| e.to_string())?;

    let path = store.save(&state)?;
    if renamed {
        store.remove(&old_name)?;
    }
    println!("  Updated {field} of {}", state.name);
    println!("  Saved to {}", path.display());

    Ok(())
}
