//! Judge collaborators for the judged evaluation strategy
//!
//! A [`Judge`] looks at two result values and a criteria description and
//! returns a [`Verdict`]. [`LlmJudge`] asks an LLM provider for that verdict
//! as a small JSON document.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use arena_llm::{LlmError, LlmProvider, LlmRequest};

/// Which side the judge preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    #[serde(rename = "A", alias = "a")]
    A,
    #[serde(rename = "B", alias = "b")]
    B,
    #[serde(rename = "DRAW", alias = "draw", alias = "Draw", alias = "TIE", alias = "tie")]
    Draw,
}

/// Structured verdict returned by a judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub choice: Choice,
    /// Confidence in the choice (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

fn default_confidence() -> f64 {
    0.5
}

impl Verdict {
    pub fn new(choice: Choice, confidence: f64, reasoning: &str) -> Self {
        Self {
            choice,
            confidence,
            reasoning: reasoning.to_string(),
        }
    }
}

/// Errors from judge collaborators
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("Judge provider failed: {0}")]
    Provider(#[from] LlmError),
    #[error("Judge returned an unreadable verdict: {0}")]
    InvalidVerdict(String),
    #[error("Judge failed: {0}")]
    Other(String),
}

/// An external comparison of two results
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, a: &Value, b: &Value, criteria: &str) -> Result<Verdict, JudgeError>;
}

const JUDGE_SYSTEM: &str = "You are an impartial evaluator. Compare two candidate responses \
against the given criteria and decide which one is better.";

/// Judge backed by an LLM provider
#[derive(Debug)]
pub struct LlmJudge<P: LlmProvider> {
    provider: P,
    /// Sampling temperature for verdicts
    pub temperature: f32,
}

impl<P: LlmProvider> LlmJudge<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            temperature: 0.0,
        }
    }

    /// Prompt asking for a JSON verdict
    pub fn prompt(a: &Value, b: &Value, criteria: &str) -> String {
        format!(
            "Criteria: {}\n\n\
             Response A:\n\"{}\"\n\n\
             Response B:\n\"{}\"\n\n\
             IMPORTANT: Respond in valid JSON format: {{\"choice\": \"A\" | \"B\" | \"DRAW\", \
             \"confidence\": float (0.0-1.0), \"reasoning\": \"string\"}}.",
            criteria,
            as_text(a),
            as_text(b)
        )
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the first JSON object embedded in a model reply
pub fn parse_verdict(reply: &str) -> Result<Verdict, JudgeError> {
    let start = reply
        .find('{')
        .ok_or_else(|| JudgeError::InvalidVerdict("No JSON found".to_string()))?;
    let end = reply
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| JudgeError::InvalidVerdict("Unterminated JSON".to_string()))?;

    let mut verdict: Verdict = serde_json::from_str(&reply[start..=end])
        .map_err(|e| JudgeError::InvalidVerdict(e.to_string()))?;
    verdict.confidence = if verdict.confidence.is_finite() {
        verdict.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Ok(verdict)
}

#[async_trait]
impl<P: LlmProvider> Judge for LlmJudge<P> {
    async fn judge(&self, a: &Value, b: &Value, criteria: &str) -> Result<Verdict, JudgeError> {
        let request = LlmRequest::new(JUDGE_SYSTEM, &Self::prompt(a, b, criteria))
            .with_temperature(self.temperature);

        let reply = self.provider.complete(request).await?.content;
        let verdict = parse_verdict(&reply)?;
        tracing::debug!(choice = ?verdict.choice, confidence = verdict.confidence, "Judge verdict");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_llm::MockProvider;
    use serde_json::json;

    #[test]
    fn test_parse_embedded_verdict() {
        let reply = "Sure! {\"choice\": \"B\", \"confidence\": 0.8, \"reasoning\": \"clearer\"} Done.";
        let verdict = parse_verdict(reply).unwrap();
        assert_eq!(verdict, Verdict::new(Choice::B, 0.8, "clearer"));
    }

    #[test]
    fn test_parse_clamps_confidence_and_accepts_aliases() {
        let verdict = parse_verdict(r#"{"choice": "tie", "confidence": 3.0}"#).unwrap();
        assert_eq!(verdict.choice, Choice::Draw);
        assert_eq!(verdict.confidence, 1.0);
        assert!(verdict.reasoning.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_verdict("I prefer A"), Err(JudgeError::InvalidVerdict(_))));
        assert!(matches!(
            parse_verdict(r#"{"choice": "C"}"#),
            Err(JudgeError::InvalidVerdict(_))
        ));
    }

    #[tokio::test]
    async fn test_llm_judge() {
        let provider = MockProvider::constant(r#"{"choice":"A","confidence":0.9,"reasoning":"more detail"}"#);
        let judge = LlmJudge::new(provider);
        let verdict = judge.judge(&json!("long answer"), &json!("short"), "helpfulness").await.unwrap();
        assert_eq!(verdict.choice, Choice::A);
        assert_eq!(verdict.reasoning, "more detail");
    }

    #[test]
    fn test_prompt_mentions_both_candidates() {
        let prompt = LlmJudge::<MockProvider>::prompt(&json!("alpha"), &json!({"k": 1}), "accuracy");
        assert!(prompt.contains("alpha"));
        assert!(prompt.contains(r#"{"k":1}"#));
        assert!(prompt.contains("Criteria: accuracy"));
    }
}
