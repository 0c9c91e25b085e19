//! Info command - Show system information
//!
//! Usage:
//! ```bash
//! arena info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use arena_core::{DEFAULT_RATING, K_FACTOR};
use arena_llm::ArenaConfig;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs, ledger: &Path, config: &ArenaConfig) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!("{}", "Arena - Configuration Tournaments".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Rating Model:".bold());
    println!("  {} {}", "Default rating:".dimmed(), DEFAULT_RATING);
    println!("  {} {}", "K-factor:".dimmed(), K_FACTOR);
    println!();

    println!("{}", "Configuration:".bold());
    println!("  {} {}", "Ledger:".dimmed(), ledger.display());
    println!("  {} {}", "Provider:".dimmed(), config.llm.default_provider.green());
    println!("  {} {}", "Model:".dimmed(), config.llm.default_model);
    println!("  {} {}", "Ollama URL:".dimmed(), config.llm.ollama_url);
    let ledger_state = if ledger.exists() { "present".green() } else { "not created yet".yellow() };
    println!("  {} {}", "Ledger file:".dimmed(), ledger_state);
    println!();

    println!("{}", "Criteria:".bold());
    println!("  {} length        longer output wins", "•".cyan());
    println!("  {} field:<name>  larger numeric field wins", "•".cyan());
    println!("  {} judge         LLM verdict on the description", "•".cyan());
    println!();

    Ok(())
}
