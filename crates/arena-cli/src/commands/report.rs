//! Report command - Ranked parameter and combination tables
//!
//! Usage:
//! ```bash
//! arena report
//! arena report --top 5 --json > leaderboard.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::Path;

use arena_core::{Leaderboard, RankedEntry};
use arena_persist::{JsonFileStore, LedgerStore};

/// Arguments for the report command
#[derive(Args)]
pub struct ReportArgs {
    /// Rows per table
    #[arg(short, long, default_value_t = 10)]
    top: usize,

    /// Output the leaderboard as JSON
    #[arg(long)]
    json: bool,
}

/// Run the report command
pub async fn run(args: ReportArgs, ledger: &Path) -> Result<()> {
    let history = JsonFileStore::new(ledger)
        .load()
        .await
        .with_context(|| format!("Failed to read ledger {}", ledger.display()))?;
    let board = Leaderboard::from_history(&history, args.top);

    if args.json {
        println!("{}", board.to_json()?);
        return Ok(());
    }

    println!("{}", "🏆 Arena Leaderboard".bold().cyan());
    println!(
        "  {} {}   {} {}",
        "Ledger:".dimmed(),
        ledger.display(),
        "Experiments:".dimmed(),
        board.experiments.to_string().green()
    );
    println!();

    if board.combinations.is_empty() {
        crate::print_info("No ratings yet. Record an experiment with `arena run`.");
        return Ok(());
    }

    for table in &board.parameters {
        println!("{}", table.parameter.bold());
        println!(
            "{}",
            ranking(
                "Value",
                table.entries.iter().map(|e| (e, e.item.to_string()))
            )
        );
        println!();
    }

    println!("{}", "Combinations".bold());
    println!(
        "{}",
        ranking(
            "Configuration",
            board.combinations.iter().map(|e| (e, e.item.to_string()))
        )
    );
    Ok(())
}

fn ranking<'a, T: 'a>(label: &str, rows: impl Iterator<Item = (&'a RankedEntry<T>, String)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Rank").fg(Color::Cyan),
            Cell::new(label).fg(Color::Cyan),
            Cell::new("Rating").fg(Color::Cyan),
            Cell::new("W / L / D").fg(Color::Cyan),
            Cell::new("Win rate").fg(Color::Cyan),
        ]);

    for (entry, item) in rows {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(item),
            Cell::new(format!("{:.1}", entry.rating)).fg(Color::Green),
            Cell::new(format!("{} / {} / {}", entry.wins, entry.losses, entry.draws)),
            Cell::new(format!("{:.0}%", entry.win_rate * 100.0)),
        ]);
    }
    table
}
