//! Evolve command - Propose a new population from the ledger
//!
//! Usage:
//! ```bash
//! arena evolve --spec spec.json
//! arena evolve --spec spec.json --population 8 --elites 3 --seed 42 --json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::{Path, PathBuf};

use arena_core::{EvolutionConfig, EvolutionEngine};
use arena_persist::JsonFileStore;
use arena_runtime::Orchestrator;

/// Arguments for the evolve command
#[derive(Args)]
pub struct EvolveArgs {
    /// Spec document giving the allowed values per parameter
    #[arg(short, long)]
    spec: PathBuf,

    /// Number of configurations to propose
    #[arg(short, long, default_value_t = 10)]
    population: usize,

    /// Top-rated combinations carried over unchanged
    #[arg(short, long, default_value_t = 2)]
    elites: usize,

    /// Probability of building a child by crossover
    #[arg(long, default_value_t = 0.7)]
    crossover_rate: f64,

    /// Per-parameter mutation probability
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Seed for a reproducible population
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON lines instead of a table
    #[arg(long)]
    json: bool,
}

/// Run the evolve command
pub async fn run(args: EvolveArgs, ledger: &Path) -> Result<()> {
    let spec = super::load_spec(&args.spec)?;

    let config = EvolutionConfig {
        crossover_rate: args.crossover_rate,
        mutation_rate: args.mutation_rate,
        ..EvolutionConfig::default()
    }
    .with_population(args.population)
    .with_elites(args.elites);

    let mut engine = match args.seed {
        Some(seed) => EvolutionEngine::seeded(config, seed),
        None => EvolutionEngine::new(config),
    };

    let orchestrator = Orchestrator::new(JsonFileStore::new(ledger));
    let history = orchestrator
        .ledger()
        .history()
        .await
        .with_context(|| format!("Failed to read ledger {}", ledger.display()))?;
    let population = orchestrator.evolve(&spec, &mut engine).await?;

    if args.json {
        for configuration in &population {
            println!("{}", serde_json::to_string(configuration)?);
        }
        return Ok(());
    }

    if history.is_unrated() {
        crate::print_warning("Ledger has no ratings yet, population is random");
    }

    println!("{}", "🧬 Proposed Population".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Configuration").fg(Color::Cyan),
            Cell::new("Rating").fg(Color::Cyan),
        ]);

    for (i, configuration) in population.iter().enumerate() {
        let rating = history
            .rating_for(configuration)
            .map(|c| Cell::new(format!("{:.1}", c.elo.rating)).fg(Color::Green))
            .unwrap_or_else(|| Cell::new("new").fg(Color::Yellow));
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(configuration.to_string()),
            rating,
        ]);
    }
    println!("{table}");
    Ok(())
}
