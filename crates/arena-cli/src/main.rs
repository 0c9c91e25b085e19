//! Arena CLI - configuration tournaments from the command line
//!
//! # Usage
//!
//! ```bash
//! # Show every configuration a spec expands to
//! arena expand --spec spec.json
//!
//! # Run an LLM experiment and rate it by reply length
//! arena run --spec spec.json --prompt "Explain {topic}" --criteria length
//!
//! # Propose the next population from the ledger
//! arena evolve --spec spec.json --population 8 --seed 42
//!
//! # Best-rated value per parameter, and full rankings
//! arena optimal --param model --param temperature
//! arena report --top 5
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use arena_llm::ArenaConfig;

mod commands;

use commands::{evolve, expand, info, optimal, report, run};

/// Arena - pairwise tournaments over parameter configurations
///
/// Runs every configuration of a parameter spec, compares the results
/// pairwise and keeps Elo ratings for each parameter value and each
/// whole configuration.
#[derive(Parser)]
#[command(
    name = "arena",
    version,
    about = "Arena CLI - Configuration Tournaments",
    long_about = "Arena compares configurations of a scored function.\n\n\
                  Every experiment is a round-robin tournament whose outcomes\n\
                  update a persistent Elo ledger that drives evolution."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the rating ledger
    #[arg(long, env = "ARENA_LEDGER", default_value = "arena-ledger.json", global = true)]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every configuration of a spec
    #[command(name = "expand")]
    Expand(expand::ExpandArgs),

    /// Run, evaluate and record an LLM experiment
    #[command(name = "run")]
    Run(run::RunArgs),

    /// Propose a new population from the ledger
    #[command(name = "evolve")]
    Evolve(evolve::EvolveArgs),

    /// Best-rated value per parameter type
    #[command(name = "optimal")]
    Optimal(optimal::OptimalArgs),

    /// Ranked parameter and combination tables
    #[command(name = "report")]
    Report(report::ReportArgs),

    /// Show system information
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ArenaConfig::from_env();

    // Setup tracing based on verbosity
    setup_logging(cli.verbose, config.debug);

    match cli.command {
        Commands::Expand(args) => expand::run(args),
        Commands::Run(args) => run::run(args, &cli.ledger, &config).await,
        Commands::Evolve(args) => evolve::run(args, &cli.ledger).await,
        Commands::Optimal(args) => optimal::run(args, &cli.ledger).await,
        Commands::Report(args) => report::run(args, &cli.ledger).await,
        Commands::Info(args) => info::run(args, &cli.ledger, &config),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8, debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 if debug => "debug",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
