//! Run command - Execute, evaluate and record an LLM experiment
//!
//! Usage:
//! ```bash
//! arena run --spec spec.json --prompt "Explain {topic}" --criteria length
//! arena run --spec spec.json --prompt "Explain {topic}" --criteria judge \
//!     --description "Which explanation is clearer?"
//! arena run --spec spec.json --prompt "Score {topic}" --criteria field:/score --provider ollama
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arena_judge::{EvaluationStrategy, Judge, LlmJudge};
use arena_llm::{ArenaConfig, LlmProvider, LlmScoredFunction, MockProvider, PromptTemplate};
use arena_persist::JsonFileStore;
use arena_runtime::{EvaluationPlan, Orchestrator};

/// Verdict the echo mock judges with; it cannot produce one itself
const MOCK_VERDICT: &str =
    r#"{"choice": "DRAW", "confidence": 0.0, "reasoning": "mock provider cannot judge"}"#;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Spec document (`{"name": [values...]}`)
    #[arg(short, long)]
    spec: PathBuf,

    /// Prompt template with `{parameter}` placeholders
    #[arg(short, long)]
    prompt: String,

    /// System prompt template
    #[arg(long)]
    system: Option<String>,

    /// How results are compared: `length`, `judge` or `field:<name>`
    #[arg(short, long, default_value = "length")]
    criteria: String,

    /// Experiment description; also the judge's criteria
    #[arg(short, long)]
    description: Option<String>,

    /// LLM provider (`mock` or `ollama`); defaults to ARENA_DEFAULT_PROVIDER
    #[arg(long)]
    provider: Option<String>,
}

/// Run the run command
pub async fn run(args: RunArgs, ledger: &Path, config: &ArenaConfig) -> Result<()> {
    let spec = super::load_spec(&args.spec)?;

    let provider_name = args
        .provider
        .clone()
        .unwrap_or_else(|| config.llm.default_provider.clone());
    let provider = config
        .llm
        .build_provider(&provider_name)
        .context("Failed to set up LLM provider")?;
    if !provider.is_available().await {
        crate::print_warning(&format!("Provider '{}' is not reachable", provider.name()));
    }

    let judge: Arc<dyn Judge> = Arc::new(LlmJudge::new(judge_provider(&provider)));
    let strategy = EvaluationStrategy::from_name(&args.criteria, Some(judge))
        .with_context(|| format!("Unusable criteria '{}'", args.criteria))?;

    let mut template = PromptTemplate::new(&args.prompt);
    if let Some(system) = &args.system {
        template = template.with_system(system);
    }
    let function = LlmScoredFunction::new(provider.clone(), template);

    let description = args
        .description
        .clone()
        .unwrap_or_else(|| format!("{} [{}]", args.prompt, strategy.label()));
    let plan = EvaluationPlan::new(description, strategy);

    let count = spec
        .combination_count()
        .context("Spec expands to too many configurations to run")?;
    println!(
        "{} {} configurations via {}",
        "▶ Running".bold().cyan(),
        count,
        provider.name().green()
    );

    tracing::debug!(
        provider = provider.name(),
        criteria = %plan.strategy.label(),
        configurations = count,
        "Starting run"
    );
    let orchestrator = Orchestrator::new(JsonFileStore::new(ledger));
    let report = orchestrator
        .run_experiment(&spec, &function, Some(&plan))
        .await
        .context("Experiment failed")?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Configuration").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("Output").fg(Color::Cyan),
        ]);

    for (i, result) in report.results.iter().enumerate() {
        let (status, output) = match (result.value(), result.error()) {
            (Some(value), _) => (
                Cell::new("ok").fg(Color::Green),
                value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()),
            ),
            (None, error) => (Cell::new("failed").fg(Color::Red), error.unwrap_or_default().to_string()),
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(result.configuration.to_string()),
            status,
            Cell::new(super::preview(&output, 60)),
        ]);
    }
    println!("{table}");

    println!(
        "  {} {} succeeded, {} failed, {} pairwise outcomes",
        "Results:".dimmed(),
        report.successes().to_string().green(),
        report.failures().to_string().red(),
        report.outcomes.len()
    );

    if let Some(history) = &report.history {
        crate::print_success(&format!(
            "Recorded to {} (version {}, {} experiments)",
            ledger.display(),
            history.version,
            history.experiments.len()
        ));
        if let Some(best) = history.top_combinations(1).first() {
            crate::print_info(&format!(
                "Leading configuration: {} ({:.1})",
                best.configuration, best.elo.rating
            ));
        }
    }
    Ok(())
}

/// Provider used by the judge
///
/// The echo mock replies with the prompt, which is never a verdict, so it is
/// swapped for a mock that scores every pair a draw.
fn judge_provider(provider: &Arc<dyn LlmProvider>) -> Arc<dyn LlmProvider> {
    if provider.name() == "echo-mock" {
        crate::print_warning("The mock provider cannot judge; judged pairs are scored as draws");
        return Arc::new(MockProvider::constant(MOCK_VERDICT));
    }
    provider.clone()
}
