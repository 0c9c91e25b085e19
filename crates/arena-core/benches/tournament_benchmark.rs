use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use arena_core::{
    cartesian, Configuration, EvaluationOutcome, EvolutionConfig, EvolutionEngine,
    ExecutionResult, ExperimentHistory, ParameterSpec,
};

fn spec(width: usize) -> ParameterSpec {
    ParameterSpec::new()
        .with("model", (0..width).map(|i| json!(format!("model-{}", i))).collect())
        .with("temperature", (0..width).map(|i| json!(i as f64 / 10.0)).collect())
        .with("max_tokens", vec![json!(256), json!(1024)])
}

/// Round robin over `configs` where the lower index always wins
fn tournament(configs: &[Configuration]) -> (Vec<ExecutionResult>, Vec<EvaluationOutcome>) {
    let results = configs
        .iter()
        .map(|c| ExecutionResult::success(c.clone(), json!("output")))
        .collect();
    let mut outcomes = Vec::new();
    for i in 0..configs.len() {
        for j in i + 1..configs.len() {
            outcomes.push(EvaluationOutcome::win(i, j));
        }
    }
    (results, outcomes)
}

fn bench_cartesian(c: &mut Criterion) {
    let mut group = c.benchmark_group("cartesian");

    for width in [2, 8, 32].iter() {
        let spec = spec(*width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &spec, |b, spec| {
            b.iter(|| cartesian(black_box(spec)))
        });
    }
    group.finish();
}

fn bench_apply_experiment(c: &mut Criterion) {
    let mut group = c.benchmark_group("ExperimentHistory::apply_experiment");

    for width in [2, 4, 8].iter() {
        let configs = cartesian(&spec(*width));
        let (results, outcomes) = tournament(&configs);
        group.bench_with_input(BenchmarkId::from_parameter(configs.len()), &(results, outcomes), |b, (results, outcomes)| {
            b.iter(|| {
                let mut history = ExperimentHistory::new();
                history
                    .apply_experiment("bench", results.clone(), outcomes.clone())
                    .map(|_| ())
            })
        });
    }
    group.finish();
}

fn bench_evolve(c: &mut Criterion) {
    let spec = spec(8);
    let configs = cartesian(&spec);
    let (results, outcomes) = tournament(&configs[..16]);
    let mut history = ExperimentHistory::new();
    let _ = history.apply_experiment("seed", results, outcomes);

    let mut engine = EvolutionEngine::seeded(EvolutionConfig::default().with_population(50), 1);
    c.bench_function("EvolutionEngine::evolve", |b| {
        b.iter(|| engine.evolve(black_box(&spec), black_box(&history)))
    });
}

criterion_group!(benches, bench_cartesian, bench_apply_experiment, bench_evolve);
criterion_main!(benches);
