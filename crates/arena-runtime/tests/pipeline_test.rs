use std::sync::Arc;

use arena_core::{Configuration, EvolutionConfig, EvolutionEngine, ParameterSpec};
use arena_judge::{EvaluationStrategy, LlmJudge};
use arena_llm::{LlmScoredFunction, MockProvider, PromptTemplate};
use arena_persist::{JsonFileStore, LedgerStore};
use arena_runtime::{EvaluationPlan, Orchestrator};

fn spec() -> ParameterSpec {
    ParameterSpec::from_json_str(
        r#"{"model": ["llama3", "mistral-large"], "temperature": [0.1, 0.9], "topic": ["rust"]}"#,
    )
    .expect("valid spec")
}

#[tokio::test]
async fn test_llm_experiment_is_recorded_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.json");

    let function = LlmScoredFunction::new(
        MockProvider::echo(),
        PromptTemplate::new("Write a haiku about {topic}"),
    );
    let plan = EvaluationPlan::new("longest reply", EvaluationStrategy::length());

    let orchestrator = Orchestrator::new(JsonFileStore::new(&path));
    let report = orchestrator
        .run_experiment(&spec(), &function, Some(&plan))
        .await?;

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.outcomes.len(), 6);
    assert!(report.results[0]
        .value()
        .and_then(|v| v.as_str())
        .is_some_and(|s| s.ends_with("Write a haiku about rust")));

    // Echo replies include the model name, so the longer name wins
    let optimal = orchestrator.optimal(&["model"]).await?;
    assert_eq!(optimal, Configuration::new().with("model", "mistral-large"));

    // A second process sees the same ledger
    let reloaded = JsonFileStore::new(&path).load().await?;
    assert_eq!(reloaded.version, 1);
    assert_eq!(reloaded.experiments[0].outcomes.len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_judged_experiment_and_evolution() -> Result<(), Box<dyn std::error::Error>> {
    let judge = LlmJudge::new(MockProvider::constant(
        r#"{"choice": "A", "confidence": 0.9, "reasoning": "first is better"}"#,
    ));
    let plan = EvaluationPlan::new("helpfulness", EvaluationStrategy::Judged(Arc::new(judge)));
    let function = LlmScoredFunction::new(MockProvider::echo(), PromptTemplate::new("{topic}"));

    let store = Arc::new(arena_persist::MemoryLedgerStore::new());
    let orchestrator = Orchestrator::new(store.clone());
    let report = orchestrator
        .run_experiment(&spec(), &function, Some(&plan))
        .await?;

    assert!(report.outcomes.iter().all(|o| o.confidence == Some(0.9)));
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.rationale.as_deref() == Some("first is better")));

    let mut engine = EvolutionEngine::seeded(EvolutionConfig::default().with_population(6), 42);
    let population = orchestrator.evolve(&spec(), &mut engine).await?;
    assert_eq!(population.len(), 6);

    let history = store.load().await?;
    assert_eq!(population[0], history.top_combinations(1)[0].configuration);
    Ok(())
}
