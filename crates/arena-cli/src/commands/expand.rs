//! Expand command - Print every configuration of a spec
//!
//! Usage:
//! ```bash
//! arena expand --spec spec.json
//! arena expand --spec spec.json --count
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use arena_core::cartesian;

/// Arguments for the expand command
#[derive(Args)]
pub struct ExpandArgs {
    /// Spec document (`{"name": [values...]}`)
    #[arg(short, long)]
    spec: PathBuf,

    /// Only print the number of configurations
    #[arg(long)]
    count: bool,
}

/// Run the expand command
pub fn run(args: ExpandArgs) -> Result<()> {
    let spec = super::load_spec(&args.spec)?;

    let Some(count) = spec.combination_count() else {
        if args.count {
            println!("more than {}", usize::MAX);
            return Ok(());
        }
        anyhow::bail!("Spec expands to more than {} configurations", usize::MAX);
    };

    if args.count {
        println!("{}", count);
        return Ok(());
    }

    // One JSON object per line
    for configuration in cartesian(&spec) {
        println!("{}", serde_json::to_string(&configuration)?);
    }
    Ok(())
}
