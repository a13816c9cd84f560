//! CLI frontend for the tasha character builder.

mod commands;
mod prompt;
mod settings;
mod store;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "tasha",
    about = "tasha: a fifth-edition character builder",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a new character and save it
    New {
        /// Character name
        name: String,

        /// Minimum total for the six rolled ability scores
        #[arg(short, long)]
        threshold: Option<u32>,

        /// RNG seed for reproducible characters
        #[arg(short, long)]
        seed: Option<u64>,

        /// Make every choice at random instead of asking
        #[arg(short, long)]
        random: bool,

        /// Directory holding saved characters
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// List saved characters
    List {
        /// Directory holding saved characters
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show a saved character sheet
    Show {
        /// Character name
        name: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,

        /// Directory holding saved characters
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Roll a set of ability scores
    Roll {
        /// Minimum total for the six scores
        #[arg(short, long)]
        threshold: Option<u32>,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Browse the rules corpus
    Srd {
        /// Category (classes, subclasses, multiclasses, backgrounds, species, feats, spells, slots, skills)
        category: String,

        /// Entry to show (lists the category when omitted)
        key: Option<String>,
    },

    /// List feats and multiclass options a saved character qualifies for
    Eligible {
        /// Character name
        name: String,

        /// Directory holding saved characters
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Change one field of a saved character
    Edit {
        /// Character name
        name: String,

        /// Field name (e.g. languages, alignment, gold)
        field: String,

        /// New value; list fields take comma-separated items
        value: String,

        /// Directory holding saved characters
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands, settings: &Settings) -> Result<(), String> {
    match command {
        Commands::New {
            name,
            threshold,
            seed,
            random,
            dir,
        } => {
            let store = settings.store(dir.as_deref());
            let threshold = threshold.unwrap_or(settings.threshold);
            commands::new::run(&store, &name, threshold, seed, random)
        }
        Commands::List { dir } => commands::list::run(&settings.store(dir.as_deref())),
        Commands::Show { name, json, dir } => {
            commands::show::run(&settings.store(dir.as_deref()), &name, json)
        }
        Commands::Roll { threshold, seed } => {
            commands::roll::run(threshold.unwrap_or(settings.threshold), seed)
        }
        Commands::Srd { category, key } => commands::srd::run(&category, key.as_deref()),
        Commands::Eligible { name, dir } => {
            commands::eligible::run(&settings.store(dir.as_deref()), &name)
        }
        Commands::Edit {
            name,
            field,
            value,
            dir,
        } => commands::edit::run(&settings.store(dir.as_deref()), &name, &field, &value),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Settings::load().and_then(|settings| run(cli.command, &settings));

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
