//! Evolutionary search over configurations
//!
//! Provides genetic algorithm primitives driven by the rating ledger:
//! - Elite selection from combination ratings
//! - Uniform crossover between two elites
//! - Per-parameter resampling mutation
//! - Best-value-per-parameter selection

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::history::ExperimentHistory;
use crate::spec::{Configuration, ParameterSpec};

/// Tunables for one evolution step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of configurations to produce
    pub population_size: usize,
    /// Top-rated configurations copied into the population unchanged
    pub elite_count: usize,
    /// Probability of filling a slot by crossover (needs two elites)
    pub crossover_rate: f64,
    /// Per-parameter probability of resampling during mutation
    pub mutation_rate: f64,
    /// Probability of mutating an elite when crossover is not chosen
    pub mutation_fallback_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            elite_count: 2,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            mutation_fallback_rate: 0.8,
        }
    }
}

impl EvolutionConfig {
    pub fn with_population(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_elites(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }
}

/// Trait for genetic operators over configurations
pub trait GeneticOperator {
    /// Build a child from two parents, one parameter at a time
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_a: &Configuration,
        parent_b: &Configuration,
        spec: &ParameterSpec,
        rng: &mut R,
    ) -> Configuration;

    /// Resample parameters of `config` in place
    fn mutate<R: Rng + ?Sized>(
        &self,
        config: &mut Configuration,
        spec: &ParameterSpec,
        mutation_rate: f64,
        rng: &mut R,
    );

    /// Sample every parameter independently from the spec
    fn random<R: Rng + ?Sized>(&self, spec: &ParameterSpec, rng: &mut R) -> Configuration {
        let mut config = Configuration::new();
        for param in spec.parameters() {
            if let Some(value) = param.values.choose(rng) {
                config.set(&param.name, value.clone());
            }
        }
        config
    }
}

/// Uniform crossover and resampling mutation
#[derive(Debug, Clone, Default)]
pub struct StandardOperator;

impl GeneticOperator for StandardOperator {
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_a: &Configuration,
        parent_b: &Configuration,
        spec: &ParameterSpec,
        rng: &mut R,
    ) -> Configuration {
        let mut child = Configuration::new();
        for param in spec.parameters() {
            let parent = if rng.random_bool(0.5) { parent_a } else { parent_b };
            let value = parent
                .get(&param.name)
                .cloned()
                .or_else(|| param.values.choose(rng).cloned());
            if let Some(value) = value {
                child.set(&param.name, value);
            }
        }
        child
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        config: &mut Configuration,
        spec: &ParameterSpec,
        mutation_rate: f64,
        rng: &mut R,
    ) {
        for param in spec.parameters() {
            if chance(rng, mutation_rate) {
                if let Some(value) = param.values.choose(rng) {
                    config.set(&param.name, value.clone());
                }
            }
        }
    }
}

/// Proposes new populations from rating history
///
/// The random source is owned by the engine so tests can seed it.
#[derive(Debug, Clone)]
pub struct EvolutionEngine<R: Rng = StdRng, O: GeneticOperator = StandardOperator> {
    pub config: EvolutionConfig,
    operator: O,
    rng: R,
}

impl EvolutionEngine {
    /// Engine seeded from the operating system
    pub fn new(config: EvolutionConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic engine for reproducible runs
    pub fn seeded(config: EvolutionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EvolutionEngine<R> {
    pub fn with_rng(config: EvolutionConfig, rng: R) -> Self {
        Self {
            config,
            operator: StandardOperator,
            rng,
        }
    }
}

impl<R: Rng, O: GeneticOperator> EvolutionEngine<R, O> {
    /// Swap in a different genetic operator
    pub fn with_operator<O2: GeneticOperator>(self, operator: O2) -> EvolutionEngine<R, O2> {
        EvolutionEngine {
            config: self.config,
            operator,
            rng: self.rng,
        }
    }

    /// Produce exactly `population_size` configurations
    pub fn evolve(&mut self, spec: &ParameterSpec, history: &ExperimentHistory) -> Vec<Configuration> {
        let size = self.config.population_size;
        let elites: Vec<Configuration> = history
            .top_combinations(self.config.elite_count)
            .into_iter()
            .map(|c| c.configuration.clone())
            .collect();

        if elites.is_empty() {
            tracing::info!(population = size, "No rated history, sampling random population");
        }

        let mut population: Vec<Configuration> = elites.iter().take(size).cloned().collect();
        let (mut crossovers, mut mutations, mut randoms) = (0usize, 0usize, 0usize);

        while population.len() < size {
            let child = if elites.len() >= 2 && chance(&mut self.rng, self.config.crossover_rate) {
                crossovers += 1;
                let parents: Vec<&Configuration> = elites.choose_multiple(&mut self.rng, 2).collect();
                self.operator
                    .crossover(parents[0], parents[1], spec, &mut self.rng)
            } else if !elites.is_empty() && chance(&mut self.rng, self.config.mutation_fallback_rate) {
                mutations += 1;
                let mut child = elites
                    .choose(&mut self.rng)
                    .cloned()
                    .unwrap_or_default();
                self.operator
                    .mutate(&mut child, spec, self.config.mutation_rate, &mut self.rng);
                child
            } else {
                randoms += 1;
                self.operator.random(spec, &mut self.rng)
            };
            population.push(child);
        }

        tracing::debug!(
            elites = elites.len(),
            crossovers,
            mutations,
            randoms,
            "Evolved population"
        );
        population
    }
}

/// Bernoulli draw that tolerates out-of-range probabilities
fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() {
        return false;
    }
    rng.random_bool(p.clamp(0.0, 1.0))
}

/// Best-rated value for each requested parameter type
///
/// Types with no rated values are left out.
pub fn optimal_configuration<S: AsRef<str>>(history: &ExperimentHistory, parameters: &[S]) -> Configuration {
    let mut config = Configuration::new();
    for name in parameters {
        let name = name.as_ref();
        if let Some(best) = history.parameter_rankings(name).first() {
            config.set(name, best.value.clone());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ParameterRating;
    use crate::outcome::{EvaluationOutcome, ExecutionResult};
    use crate::rating::EloRating;
    use serde_json::json;

    fn base_spec() -> ParameterSpec {
        ParameterSpec::new()
            .with("model", vec![json!("gpt-4"), json!("gpt-3.5"), json!("claude")])
            .with("temperature", vec![json!(0.2), json!(0.7), json!(1.0)])
    }

    fn in_spec(config: &Configuration, spec: &ParameterSpec) -> bool {
        spec.parameters().all(|p| match config.get(&p.name) {
            Some(v) => p.values.contains(v),
            None => false,
        })
    }

    fn history_with_elite(elite: &Configuration) -> ExperimentHistory {
        let mut history = ExperimentHistory::new();
        let results = vec![
            ExecutionResult::success(elite.clone(), json!("win")),
            ExecutionResult::success(
                Configuration::new().with("model", "claude").with("temperature", 0.2),
                json!("lose"),
            ),
        ];
        history
            .apply_experiment("seed", results, vec![EvaluationOutcome::win(0, 1)])
            .unwrap();
        history
    }

    #[test]
    fn test_elite_seeds_population() {
        let elite = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        let history = history_with_elite(&elite);

        let mut engine = EvolutionEngine::seeded(EvolutionConfig::default().with_population(5), 7);
        let population = engine.evolve(&base_spec(), &history);

        assert_eq!(population.len(), 5);
        assert_eq!(population[0], elite);
        assert!(population.iter().all(|c| in_spec(c, &base_spec())));
    }

    #[test]
    fn test_no_history_gives_random_population() {
        let mut engine = EvolutionEngine::seeded(EvolutionConfig::default(), 1);
        let population = engine.evolve(&base_spec(), &ExperimentHistory::new());
        assert_eq!(population.len(), 10);
        assert!(population.iter().all(|c| in_spec(c, &base_spec())));
    }

    #[test]
    fn test_population_truncated_to_size() {
        let elite = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        let history = history_with_elite(&elite);
        let config = EvolutionConfig::default().with_population(1).with_elites(5);
        let population = EvolutionEngine::seeded(config, 3).evolve(&base_spec(), &history);
        assert_eq!(population, vec![elite]);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let elite = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        let history = history_with_elite(&elite);
        let a = EvolutionEngine::seeded(EvolutionConfig::default(), 42).evolve(&base_spec(), &history);
        let b = EvolutionEngine::seeded(EvolutionConfig::default(), 42).evolve(&base_spec(), &history);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_takes_genes_from_parents() {
        let a = Configuration::new().with("model", "gpt-4").with("temperature", 0.2);
        let b = Configuration::new().with("model", "claude").with("temperature", 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let child = StandardOperator.crossover(&a, &b, &base_spec(), &mut rng);
            for (name, value) in child.iter() {
                assert!(a.get(name) == Some(value) || b.get(name) == Some(value));
            }
            assert_eq!(child.len(), 2);
        }
    }

    #[test]
    fn test_crossover_fills_missing_gene_from_spec() {
        let a = Configuration::new().with("model", "gpt-4");
        let b = Configuration::new().with("model", "claude");
        let mut rng = StdRng::seed_from_u64(5);
        let child = StandardOperator.crossover(&a, &b, &base_spec(), &mut rng);
        assert!(in_spec(&child, &base_spec()));
    }

    #[test]
    fn test_full_mutation_stays_in_spec() {
        let mut config = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        let mut rng = StdRng::seed_from_u64(11);
        StandardOperator.mutate(&mut config, &base_spec(), 1.0, &mut rng);
        assert!(in_spec(&config, &base_spec()));

        let mut untouched = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        StandardOperator.mutate(&mut untouched, &base_spec(), 0.0, &mut rng);
        assert_eq!(untouched, Configuration::new().with("model", "gpt-4").with("temperature", 0.7));
    }

    /// Standard operator that counts mutations
    #[derive(Default)]
    struct CountingOperator {
        mutations: std::cell::Cell<usize>,
    }

    impl GeneticOperator for CountingOperator {
        fn crossover<R: Rng + ?Sized>(
            &self,
            parent_a: &Configuration,
            parent_b: &Configuration,
            spec: &ParameterSpec,
            rng: &mut R,
        ) -> Configuration {
            StandardOperator.crossover(parent_a, parent_b, spec, rng)
        }

        fn mutate<R: Rng + ?Sized>(
            &self,
            config: &mut Configuration,
            spec: &ParameterSpec,
            mutation_rate: f64,
            rng: &mut R,
        ) {
            self.mutations.set(self.mutations.get() + 1);
            StandardOperator.mutate(config, spec, mutation_rate, rng);
        }
    }

    #[test]
    fn test_mutation_fills_from_elite() {
        let elite = Configuration::new().with("model", "gpt-4").with("temperature", 0.7);
        let history = history_with_elite(&elite);
        let mut config = EvolutionConfig::default().with_population(8).with_elites(1);
        config.crossover_rate = 0.0;
        config.mutation_fallback_rate = 1.0;
        config.mutation_rate = 0.5;

        let mut engine = EvolutionEngine::seeded(config, 21).with_operator(CountingOperator::default());
        let population = engine.evolve(&base_spec(), &history);

        assert_eq!(population.len(), 8);
        assert_eq!(population[0], elite);
        assert_eq!(engine.operator.mutations.get(), 7);
        let spec = base_spec();
        for child in &population[1..] {
            assert_eq!(child.len(), 2);
            for (name, value) in child.iter() {
                let candidates = spec.values(name).unwrap();
                assert!(elite.get(name) == Some(value) || candidates.contains(value));
            }
        }

        // Without resampling every child is a copy of the elite
        config.mutation_rate = 0.0;
        let population = EvolutionEngine::seeded(config, 21).evolve(&base_spec(), &history);
        assert!(population.iter().all(|c| *c == elite));
    }

    #[test]
    fn test_optimal_configuration() {
        let mut history = ExperimentHistory::new();
        history.parameter_ratings = vec![
            ParameterRating {
                parameter: "model".to_string(),
                value: json!("gpt-3.5"),
                elo: EloRating::with_rating(1180.0),
            },
            ParameterRating {
                parameter: "model".to_string(),
                value: json!("gpt-4"),
                elo: EloRating::with_rating(1240.0),
            },
        ];

        let best = optimal_configuration(&history, &["model"]);
        assert_eq!(best, Configuration::new().with("model", "gpt-4"));

        let partial = optimal_configuration(&history, &["model", "temperature"]);
        assert!(!partial.contains("temperature"));
    }
}
