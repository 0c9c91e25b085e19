//! Optimal command - Best-rated value per parameter type
//!
//! Usage:
//! ```bash
//! arena optimal --param model --param temperature
//! arena optimal            # every rated parameter type
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use arena_persist::JsonFileStore;
use arena_runtime::Orchestrator;

/// Arguments for the optimal command
#[derive(Args)]
pub struct OptimalArgs {
    /// Parameter types to include (repeatable)
    #[arg(short, long = "param")]
    params: Vec<String>,
}

/// Run the optimal command
pub async fn run(args: OptimalArgs, ledger: &Path) -> Result<()> {
    let orchestrator = Orchestrator::new(JsonFileStore::new(ledger));

    let params: Vec<String> = if args.params.is_empty() {
        let history = orchestrator
            .ledger()
            .history()
            .await
            .with_context(|| format!("Failed to read ledger {}", ledger.display()))?;
        history
            .parameter_types()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.params
    };

    let optimal = orchestrator.optimal(&params).await?;
    for name in params.iter().filter(|p| !optimal.contains(p)) {
        crate::print_warning(&format!("No ratings for parameter '{}'", name));
    }

    println!("{}", serde_json::to_string_pretty(&optimal)?);
    Ok(())
}
