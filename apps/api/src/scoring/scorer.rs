//! Resume scoring: a trait-based scorer that rates extracted resume text against a job description.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`; production uses `LlmResumeScorer`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::llm_client::LlmClient;
use crate::scoring::prompts::{build_score_prompt, SCORE_SYSTEM};

pub const MISSING_KEY_SUMMARY: &str = "Error: Groq API key not configured.";

/// The model's verdict for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u32, // 0 – 100
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "deserialize_list", skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_list", skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<String>>,
}

impl Evaluation {
    /// A zero score carrying only an explanation.
    pub fn failed(summary: impl Into<String>) -> Self {
        Self {
            score: 0,
            summary: summary.into(),
            strengths: None,
            weaknesses: None,
        }
    }
}

/// Accepts integer, float or numeric-string scores and clamps them to 0–100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match &raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("score is not a number: {raw}")))?;

    Ok(value.round().clamp(0.0, 100.0) as u32)
}

/// Accepts an array of strings or a single delimited string. Any other shape
/// becomes `None` rather than failing the whole evaluation.
fn deserialize_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let items = match raw {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        serde_json::Value::String(s) => {
            let items: Vec<String> = s
                .split(|c: char| matches!(c, ',' | ';' | '\n'))
                .map(|item| item.trim().trim_start_matches(['-', '*', '•']).trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            if items.is_empty() {
                return Ok(None);
            }
            items
        }
        _ => return Ok(None),
    };
    Ok(Some(items))
}

/// Implement this to swap scoring backends without touching the handler.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    /// Never fails: provider and parse errors are folded into a zero-score evaluation.
    async fn score(&self, resume_text: &str, job_description: &str) -> Evaluation;
}

/// Scores through the Groq chat-completions API.
pub struct LlmResumeScorer {
    llm: Option<LlmClient>,
}

impl LlmResumeScorer {
    /// `None` means no API key is configured; every call short-circuits.
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    async fn score(&self, resume_text: &str, job_description: &str) -> Evaluation {
        let Some(llm) = &self.llm else {
            warn!("Scoring requested but no Groq API key is configured");
            return Evaluation::failed(MISSING_KEY_SUMMARY);
        };

        debug!("Scoring resume, text length: {}", resume_text.chars().count());

        let prompt = build_score_prompt(job_description, resume_text);
        match llm.call_json::<Evaluation>(&prompt, SCORE_SYSTEM).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("Scoring call failed: {e}");
                Evaluation::failed(format!("Error during scoring: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let scorer = LlmResumeScorer::new(None);
        let evaluation = scorer.score("Jane Doe, Rust", "Rust engineer").await;
        assert_eq!(evaluation, Evaluation::failed(MISSING_KEY_SUMMARY));
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            json!({ "score": 0, "summary": "Error: Groq API key not configured." })
        );
    }

    #[test]
    fn test_full_model_reply_parses() {
        let reply = r#"{
            "score": 82,
            "summary": "Strong Rust background.",
            "strengths": ["Rust", "Distributed systems", "Mentoring"],
            "weaknesses": ["No Kafka", "Limited frontend", "No cloud certs"]
        }"#;
        let evaluation: Evaluation = parse_json_reply(reply).unwrap();
        assert_eq!(evaluation.score, 82);
        assert_eq!(evaluation.strengths.as_ref().map(Vec::len), Some(3));
        assert_eq!(evaluation.weaknesses.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_score_variants_are_normalised() {
        let float: Evaluation = parse_json_reply(r#"{"score": 77.6, "summary": "ok"}"#).unwrap();
        assert_eq!(float.score, 78);

        let text: Evaluation = parse_json_reply(r#"{"score": "65%", "summary": "ok"}"#).unwrap();
        assert_eq!(text.score, 65);

        let over: Evaluation = parse_json_reply(r#"{"score": 140, "summary": "ok"}"#).unwrap();
        assert_eq!(over.score, 100);
    }

    #[test]
    fn test_non_numeric_score_is_rejected() {
        assert!(parse_json_reply::<Evaluation>(r#"{"score": "high", "summary": "ok"}"#).is_err());
    }

    #[test]
    fn test_list_given_as_string_is_split() {
        let reply = r#"{
            "score": 85,
            "summary": "Good fit",
            "strengths": "Rust, Go, Kubernetes",
            "weaknesses": "- No Kafka\n- Limited frontend"
        }"#;
        let evaluation: Evaluation = parse_json_reply(reply).unwrap();
        assert_eq!(evaluation.score, 85);
        assert_eq!(evaluation.summary, "Good fit");
        assert_eq!(
            evaluation.strengths,
            Some(vec!["Rust".to_string(), "Go".to_string(), "Kubernetes".to_string()])
        );
        assert_eq!(
            evaluation.weaknesses,
            Some(vec!["No Kafka".to_string(), "Limited frontend".to_string()])
        );
    }

    #[test]
    fn test_unexpected_list_shapes_are_dropped() {
        let reply = r#"{
            "score": 60,
            "summary": "ok",
            "strengths": {"technical": "Rust"},
            "weaknesses": null
        }"#;
        let evaluation: Evaluation = parse_json_reply(reply).unwrap();
        assert_eq!(evaluation.score, 60);
        assert_eq!(evaluation.strengths, None);
        assert_eq!(evaluation.weaknesses, None);

        let mixed: Evaluation =
            parse_json_reply(r#"{"score": 60, "summary": "ok", "strengths": ["Rust", 3, ""]}"#).unwrap();
        assert_eq!(mixed.strengths, Some(vec!["Rust".to_string()]));
    }

    #[test]
    fn test_absent_lists_are_not_serialized() {
        let evaluation: Evaluation = parse_json_reply(r#"{"score": 50, "summary": "meh"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            json!({ "score": 50, "summary": "meh" })
        );
    }
}
