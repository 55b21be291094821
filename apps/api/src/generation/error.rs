//! Error types for the generation pipelines.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// The four pipelines, used to tag errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    JobAnalysis,
    StudyPlan,
    QuestionGeneration,
    AnswerEvaluation,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::JobAnalysis => "job_analysis",
            Operation::StudyPlan => "study_plan",
            Operation::QuestionGeneration => "question_generation",
            Operation::AnswerEvaluation => "answer_evaluation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single attempt failed in a way worth retrying.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("provider error: {0}")]
    Provider(#[source] LlmError),

    #[error("no response within {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("response is not valid for the schema: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request failed basic checks. Nothing was sent to the model.
    #[error("invalid request: {0}")]
    RequestInvalid(String),

    /// Credential or configuration problem. Not retried.
    #[error("{operation}: model provider rejected the call: {source}")]
    ProviderFatal {
        operation: Operation,
        #[source]
        source: LlmError,
    },

    #[error("{operation}: generation failed after {attempts} attempts: {last_cause}")]
    GenerationFailed {
        operation: Operation,
        attempts: u32,
        #[source]
        last_cause: AttemptFailure,
    },

    #[error("{operation}: cancelled after {attempts} attempts")]
    Cancelled { operation: Operation, attempts: u32 },
}

impl PipelineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PipelineError::RequestInvalid(message.into())
    }
}
