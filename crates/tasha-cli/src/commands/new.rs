use colored::Colorize;

use tasha_mechanics::{CharacterState, Prompt, RandomPrompt, Session, SessionConfig};
use tasha_srd::Srd;

use crate::prompt::ConsolePrompt;
use crate::store::CharacterStore;

pub fn run(
    store: &CharacterStore,
    name: &str,
    threshold: u32,
    seed: Option<u64>,
    random: bool,
) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("character name cannot be empty".into());
    }

    let srd = super::load_srd()?;
    let mut config = SessionConfig::default().with_threshold(threshold);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let state = if random {
        let prompt_seed = seed.unwrap_or_else(rand::random);
        build(&srd, RandomPrompt::new(prompt_seed), config, name)?
    } else {
        println!("  {} {name}", "Creating".bold());
        build(&srd, ConsolePrompt::stdio(), config, name)?
    };

    let path = store.save(&state)?;
    println!(
        "  Created {}: {} {}, {}",
        state.name.bold(),
        state.species,
        state.background,
        super::class_summary(&state)
    );
    println!("  Saved to {}", path.display());

    Ok(())
}

fn build<P: Prompt>(
    srd: &Srd,
    prompt: P,
    config: SessionConfig,
    name: &str,
) -> Result<CharacterState, String> {
    Session::new(srd, prompt, config)
        .and_then(|session| session.run(name))
        .map_err(|e| e.to_string())
}
