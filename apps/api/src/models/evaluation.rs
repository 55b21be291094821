use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{array_schema, object_schema, string_schema};

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub question: String,
    #[serde(default)]
    pub expected_key_points: Vec<String>,
    pub user_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    /// 0..=100. Negative values fail to decode; values above 100 are rejected
    /// by the result validator.
    pub score: u32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub example_answer: String,
    pub overall_feedback: String,
}

impl AnswerEvaluation {
    pub fn json_schema() -> Value {
        object_schema(
            &[
                (
                    "score",
                    json!({"type": "INTEGER", "description": "0 (no credit) to 100 (excellent)"}),
                ),
                ("strengths", array_schema(string_schema())),
                ("improvements", array_schema(string_schema())),
                ("example_answer", string_schema()),
                ("overall_feedback", string_schema()),
            ],
            &[],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_score_fails_decode() {
        let result = serde_json::from_str::<AnswerEvaluation>(
            r#"{"score": -3, "strengths": [], "improvements": [], "example_answer": "x", "overall_feedback": "y"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_request_key_points_default_to_empty() {
        let request: EvaluationRequest =
            serde_json::from_str(r#"{"question": "Why us?", "user_answer": "Mission."}"#).unwrap();
        assert!(request.expected_key_points.is_empty());
    }
}
