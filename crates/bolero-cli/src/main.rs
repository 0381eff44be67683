//! bolero CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use bolero_core::model::WordClass;
use bolero_core::statistics::DifficultyTier;

mod commands;

use commands::word::{NewWordArgs, WordFieldArgs};

#[derive(Parser)]
#[command(name = "bolero", version, about = "German-English vocabulary trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Word store file, overrides the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example vocabulary
    Init,

    /// Add a new word
    Add(NewWordArgs),

    /// Change fields of a stored word, keeping its practice history
    Update {
        /// The German word to change
        word: String,

        #[command(flatten)]
        fields: WordFieldArgs,
    },

    /// Import words from a TOML file or directory
    Import {
        /// Path to vocabulary .toml file or directory
        #[arg(long)]
        file: PathBuf,

        /// Replace words that already exist (history is kept)
        #[arg(long)]
        replace: bool,
    },

    /// Validate vocabulary TOML files without importing
    Validate {
        /// Path to vocabulary .toml file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// Show every stored word
    List,

    /// Show per-word success ratios and difficulty tiers
    Stats {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the practice dashboard
    Report {
        /// First day of the daily counts (default from config)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Rows in the last-failures table (default from config)
        #[arg(long)]
        last_failures: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Generate or submit a quiz
    Quiz {
        #[command(subcommand)]
        action: QuizCommand,
    },
}

#[derive(Subcommand)]
enum QuizCommand {
    /// Draw a new quiz sheet
    New {
        /// Number of words to ask
        #[arg(long)]
        size: usize,

        /// Only ask words of this class
        #[arg(long)]
        class: Option<WordClass>,

        /// Only ask words of this difficulty tier
        #[arg(long)]
        difficulty: Option<DifficultyTier>,

        /// RNG seed (default: month * 100 + day)
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the sheet
        #[arg(long, default_value = "quiz.json")]
        out: PathBuf,
    },

    /// Score an answered sheet and log the results
    Submit {
        /// Answered quiz sheet
        #[arg(long)]
        sheet: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "bolero=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let store = cli.store;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Add(args) => commands::word::add(config, store, args),
        Commands::Update { word, fields } => commands::word::update(config, store, word, fields),
        Commands::Import { file, replace } => {
            commands::import::execute(config, store, file, replace)
        }
        Commands::Validate { file } => commands::validate::execute(config, store, file),
        Commands::List => commands::list::execute(config, store),
        Commands::Stats { format } => commands::stats::execute(config, store, format),
        Commands::Report {
            since,
            last_failures,
            format,
        } => commands::report::execute(config, store, since, last_failures, format),
        Commands::Quiz { action } => match action {
            QuizCommand::New {
                size,
                class,
                difficulty,
                seed,
                out,
            } => commands::quiz::new(config, store, size, class, difficulty, seed, out),
            QuizCommand::Submit { sheet } => commands::quiz::submit(config, store, sheet),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
