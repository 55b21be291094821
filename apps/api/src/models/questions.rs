use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::job_analysis::JobAnalysis;
use super::{array_schema, enum_schema, object_schema, string_schema};

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub job_analysis: JobAnalysis,
    pub topic: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuestionDifficulty {
    pub const ALL: [&'static str; 3] = ["Easy", "Medium", "Hard"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    Technical,
    Behavioral,
    Situational,
}

impl QuestionType {
    pub const ALL: [&'static str; 3] = ["Technical", "Behavioral", "Situational"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub text: String,
    pub difficulty: QuestionDifficulty,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub hint: String,
    pub key_points: Vec<String>,
}

/// Practice questions. The length approximates the requested count; the
/// model decides the exact number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<PracticeQuestion>,
}

impl QuestionSet {
    pub fn json_schema() -> Value {
        let question = object_schema(
            &[
                ("text", string_schema()),
                ("difficulty", enum_schema(&QuestionDifficulty::ALL)),
                ("type", enum_schema(&QuestionType::ALL)),
                ("hint", string_schema()),
                ("key_points", array_schema(string_schema())),
            ],
            &[],
        );

        object_schema(&[("questions", array_schema(question))], &[])
    }
}
