//! Request/result records exchanged with the pipelines, plus the response
//! schema each result type sends to the model.

pub mod evaluation;
pub mod job_analysis;
pub mod questions;
pub mod study_plan;

use serde_json::{json, Value};

pub use evaluation::{AnswerEvaluation, EvaluationRequest};
pub use job_analysis::{
    DifficultyLevel, ExperienceLevel, JobAnalysis, JobAnalysisRequest, Skill, SkillCategory,
    SkillImportance,
};
pub use questions::{PracticeQuestion, QuestionDifficulty, QuestionRequest, QuestionSet, QuestionType};
pub use study_plan::{ResourceType, StudyPlan, StudyPlanRequest, StudyResource, StudyTopic};

// Schema builders for the provider's OpenAPI subset (upper-case type names).

pub(crate) fn string_schema() -> Value {
    json!({"type": "STRING"})
}

pub(crate) fn enum_schema(values: &[&str]) -> Value {
    json!({"type": "STRING", "format": "enum", "enum": values})
}

pub(crate) fn array_schema(items: Value) -> Value {
    json!({"type": "ARRAY", "items": items})
}

/// Object schema where every listed property is required unless named in
/// `optional`.
pub(crate) fn object_schema(properties: &[(&str, Value)], optional: &[&str]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    let required: Vec<&str> = properties
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !optional.contains(name))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": props,
        "required": required,
        "propertyOrdering": properties.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
    })
}
