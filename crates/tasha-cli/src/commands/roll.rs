use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tasha_mechanics::{generate_scores, modifier};

pub fn run(threshold: u32, seed: Option<u64>) -> Result<(), String> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let scores = generate_scores(threshold, &mut rng).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Roll", "Score", "Modifier"]);
    for (i, score) in scores.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            score.to_string(),
            super::signed(modifier(*score)),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  Total: {} (threshold {threshold}, seed {seed})",
        scores.iter().sum::<u32>().to_string().bold()
    );

    Ok(())
}
