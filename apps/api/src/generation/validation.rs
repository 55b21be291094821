//! Result validation: turns raw model text into a typed result, or says why
//! it cannot.
//!
//! Decoding enforces the structural schema (required fields, enumerations,
//! integer types). `StructuredOutput::validate` enforces the value
//! constraints serde cannot express. Errors send the generator round the
//! retry loop; warnings are logged and the value is kept.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::generation::error::AttemptFailure;
use crate::llm_client::strip_json_fences;
use crate::models::{AnswerEvaluation, JobAnalysis, QuestionSet, StudyPlan};

/// Below this score an evaluation is expected to suggest an improvement.
pub const IMPROVEMENTS_EXPECTED_BELOW: u32 = 90;
pub const MAX_SCORE: u32 = 100;
pub const MIN_TOPIC_PRIORITY: u8 = 1;
pub const MAX_TOPIC_PRIORITY: u8 = 5;

/// Result of validating one decoded payload.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Violations that make the payload unusable.
    pub errors: Vec<String>,
    /// Quality concerns that do not block the result.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_error(format!("{field} is empty"));
        }
    }

    fn require_items<T>(&mut self, field: &str, items: &[T]) {
        if items.is_empty() {
            self.add_error(format!("{field} has no entries"));
        }
    }

    fn require_positive_hours(&mut self, field: &str, hours: f64) {
        if !hours.is_finite() || hours <= 0.0 {
            self.add_error(format!("{field} must be a positive number of hours, got {hours}"));
        }
    }
}

/// A result type the structured generator can produce.
pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    /// Schema name sent with the request and used in logs.
    const SCHEMA_NAME: &'static str;

    fn response_schema() -> Value;

    fn validate(&self) -> ValidationReport;
}

/// Decodes `raw` as `T` and applies its value constraints.
///
/// Pure: no I/O, no retries. Soft warnings are logged here so every caller
/// gets them.
pub fn decode_and_validate<T: StructuredOutput>(raw: &str) -> Result<T, AttemptFailure> {
    let value: T = serde_json::from_str(strip_json_fences(raw)).map_err(AttemptFailure::Decode)?;

    let report = value.validate();
    for warning in &report.warnings {
        warn!("{} validation warning: {}", T::SCHEMA_NAME, warning);
    }

    if report.is_valid() {
        Ok(value)
    } else {
        Err(AttemptFailure::Invalid(report.errors))
    }
}

impl StructuredOutput for JobAnalysis {
    const SCHEMA_NAME: &'static str = "JobAnalysis";

    fn response_schema() -> Value {
        JobAnalysis::json_schema()
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require_text("role_title", &self.role_title);
        report.require_text("company_type", &self.company_type);
        report.require_text("summary", &self.summary);
        report.require_items("key_skills", &self.key_skills);

        let mut seen = std::collections::HashSet::new();
        for (i, skill) in self.key_skills.iter().enumerate() {
            report.require_text(&format!("key_skills[{i}].name"), &skill.name);
            if !seen.insert(skill.name.trim().to_lowercase()) {
                report.add_warning(format!("duplicate skill '{}'", skill.name.trim()));
            }
        }

        report
    }
}

impl StructuredOutput for StudyPlan {
    const SCHEMA_NAME: &'static str = "StudyPlan";

    fn response_schema() -> Value {
        StudyPlan::json_schema()
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require_text("strategy", &self.strategy);
        report.require_text("timeline", &self.timeline);
        report.require_items("topics", &self.topics);
        report.require_positive_hours("total_duration_hours", self.total_duration_hours);

        for (i, topic) in self.topics.iter().enumerate() {
            report.require_text(&format!("topics[{i}].name"), &topic.name);
            report.require_text(&format!("topics[{i}].description"), &topic.description);
            report.require_positive_hours(
                &format!("topics[{i}].estimated_hours"),
                topic.estimated_hours,
            );
            if !(MIN_TOPIC_PRIORITY..=MAX_TOPIC_PRIORITY).contains(&topic.priority) {
                report.add_error(format!(
                    "topics[{i}].priority {} is outside {MIN_TOPIC_PRIORITY}..={MAX_TOPIC_PRIORITY}",
                    topic.priority
                ));
            }
            for (j, resource) in topic.resources.iter().enumerate() {
                report.require_text(&format!("topics[{i}].resources[{j}].title"), &resource.title);
                if let Some(url) = &resource.url {
                    if !url.starts_with("http") {
                        report.add_warning(format!("resource '{}' has a non-http url", resource.title));
                    }
                }
            }
        }

        let topic_hours: f64 = self.topics.iter().map(|t| t.estimated_hours).sum();
        if self.total_duration_hours.is_finite()
            && self.total_duration_hours > 0.0
            && (topic_hours - self.total_duration_hours).abs() > self.total_duration_hours * 0.5
        {
            report.add_warning(format!(
                "topic hours sum to {topic_hours} but total_duration_hours is {}",
                self.total_duration_hours
            ));
        }

        report
    }
}

impl StructuredOutput for QuestionSet {
    const SCHEMA_NAME: &'static str = "QuestionSet";

    fn response_schema() -> Value {
        QuestionSet::json_schema()
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require_items("questions", &self.questions);

        for (i, question) in self.questions.iter().enumerate() {
            report.require_text(&format!("questions[{i}].text"), &question.text);
            report.require_text(&format!("questions[{i}].hint"), &question.hint);
            report.require_items(&format!("questions[{i}].key_points"), &question.key_points);
            if question.key_points.iter().any(|p| p.trim().is_empty()) {
                report.add_error(format!("questions[{i}].key_points contains an empty entry"));
            }
        }

        report
    }
}

/// Compares the returned question count with the requested one. The count
/// is a target for the model, so a mismatch is only a warning.
pub fn check_question_count(set: &QuestionSet, requested: u32) -> ValidationReport {
    let mut report = ValidationReport::default();
    if set.questions.len() != requested as usize {
        report.add_warning(format!(
            "requested {requested} questions, model returned {}",
            set.questions.len()
        ));
    }
    report
}

impl StructuredOutput for AnswerEvaluation {
    const SCHEMA_NAME: &'static str = "AnswerEvaluation";

    fn response_schema() -> Value {
        AnswerEvaluation::json_schema()
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        if self.score > MAX_SCORE {
            report.add_error(format!("score {} is outside 0..={MAX_SCORE}", self.score));
        }
        report.require_items("strengths", &self.strengths);
        report.require_text("example_answer", &self.example_answer);
        report.require_text("overall_feedback", &self.overall_feedback);

        // Content quality only; the evaluation is still complete without it.
        if self.score < IMPROVEMENTS_EXPECTED_BELOW && self.improvements.is_empty() {
            report.add_warning(format!(
                "improvements is empty for a score of {} (expected below {IMPROVEMENTS_EXPECTED_BELOW})",
                self.score
            ));
        }

        report
    }
}
