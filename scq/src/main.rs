//! scq: Scry Query - CLI for searching a local card catalog.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "scq")]
#[command(about = "Scry Query - search a local card catalog with Scryfall-style queries")]
#[command(version)]
struct Cli {
    /// Log dropped terms and generated SQL to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the card catalog
    Init,

    /// Import cards from a Scryfall JSON file (.json or .json.gz)
    Import {
        /// Path to the card file
        file: String,
    },

    /// Search the catalog
    #[command(visible_alias = "s")]
    Search {
        /// Query, e.g. 'c:ur t:creature mv>=3'
        query: String,

        /// Maximum results (default from config)
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,

        /// Output format
        #[arg(
            short = 'f',
            long = "format",
            default_value = "table",
            value_parser = ["table", "json"]
        )]
        format: String,

        /// Include tokens, emblems and other extras
        #[arg(long = "include-extras")]
        include_extras: bool,
    },

    /// Show one card by id
    Card {
        /// Card id (UUID)
        id: String,
    },

    /// List every recognized search key
    Keys,

    /// Show what a query compiles to
    #[command(visible_alias = "c")]
    Compile {
        /// Query to compile
        query: String,

        /// Output format
        #[arg(
            short = 'f',
            long = "format",
            default_value = "text",
            value_parser = ["text", "json", "sql"]
        )]
        format: String,

        /// Also print the token stream
        #[arg(short = 't', long = "tokens")]
        tokens: bool,
    },

    /// Show catalog statistics
    Stats,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init(),
        Commands::Import { file } => commands::import(&file),
        Commands::Search { query, limit, format, include_extras } => {
            commands::search(&query, limit, &format, include_extras)
        }
        Commands::Card { id } => commands::card(&id),
        Commands::Keys => commands::keys(),
        Commands::Compile { query, format, tokens } => commands::compile(&query, &format, tokens),
        Commands::Stats => commands::stats(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
