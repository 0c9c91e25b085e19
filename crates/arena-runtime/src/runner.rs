//! Experiment runner - invokes the scored function over a configuration batch

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use arena_core::{Configuration, ExecutionResult, ScoredFunction};

/// Configuration for the runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Record a panicking invocation as a failed result instead of unwinding
    pub capture_panics: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            capture_panics: true,
        }
    }
}

/// Runs every configuration concurrently and collects index-aligned results
#[derive(Debug, Clone, Default)]
pub struct ExperimentRunner {
    pub config: RunnerConfig,
}

impl ExperimentRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Invoke `function` once per configuration
    ///
    /// All invocations start together and are awaited as a group. A failure
    /// in one invocation never cancels another, and the output has the same
    /// length and order as `configurations`.
    pub async fn run<F>(&self, configurations: &[Configuration], function: &F) -> Vec<ExecutionResult>
    where
        F: ScoredFunction + ?Sized,
    {
        let start = Instant::now();
        let calls = configurations
            .iter()
            .map(|configuration| self.run_one(configuration, function));
        let results = join_all(calls).await;

        let failures = results.iter().filter(|r| !r.is_success()).count();
        metrics::counter!("arena_executions_total").increment(results.len() as u64);
        metrics::counter!("arena_execution_failures_total").increment(failures as u64);
        tracing::info!(
            configurations = results.len(),
            failures,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch settled"
        );
        results
    }

    async fn run_one<F>(&self, configuration: &Configuration, function: &F) -> ExecutionResult
    where
        F: ScoredFunction + ?Sized,
    {
        let outcome = AssertUnwindSafe(function.score(configuration))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(payload) if self.config.capture_panics => {
                Err(format!("panicked: {}", panic_message(payload.as_ref())))
            }
            Err(payload) => std::panic::resume_unwind(payload),
        };

        match result {
            Ok(value) => ExecutionResult::success(configuration.clone(), value),
            Err(message) => {
                tracing::warn!(configuration = %configuration, error = %message, "Invocation failed");
                ExecutionResult::failure(configuration.clone(), message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ScoreError;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn configs(n: i64) -> Vec<Configuration> {
        (0..n).map(|i| Configuration::new().with("i", i)).collect()
    }

    #[tokio::test]
    async fn test_results_align_with_input() {
        // Later configurations finish first
        let f = |config: Configuration| async move {
            let i = config.get("i").and_then(Value::as_i64).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis((10 - i as u64) * 5)).await;
            if i % 3 == 0 {
                Err(ScoreError::new(format!("bad {}", i)))
            } else {
                Ok(json!(i * 10))
            }
        };

        let input = configs(10);
        let results = ExperimentRunner::default().run(&input, &f).await;

        assert_eq!(results.len(), 10);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.configuration, input[i]);
            if i % 3 == 0 {
                assert_eq!(result.error(), Some(format!("bad {}", i).as_str()));
            } else {
                assert_eq!(result.value(), Some(&json!(i as i64 * 10)));
            }
        }
    }

    #[tokio::test]
    async fn test_invocations_run_concurrently() {
        let f = |_config: Configuration| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, ScoreError>(json!("done"))
        };
        let start = Instant::now();
        let results = ExperimentRunner::default().run(&configs(8), &f).await;
        assert_eq!(results.len(), 8);
        assert!(start.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let f = |config: Configuration| async move {
            if config.get("i") == Some(&json!(1)) {
                panic!("exploded");
            }
            Ok::<_, ScoreError>(json!("fine"))
        };
        let results = ExperimentRunner::default().run(&configs(3), &f).await;
        assert!(results[0].is_success());
        assert_eq!(results[1].error(), Some("panicked: exploded"));
        assert!(results[2].is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let f = |_config: Configuration| async move { Ok::<_, ScoreError>(json!(null)) };
        assert!(ExperimentRunner::default().run(&[], &f).await.is_empty());
    }
}
