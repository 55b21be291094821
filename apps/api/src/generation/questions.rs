//! Question generation pipeline: practice questions for one topic of a role.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::generation::error::{Operation, PipelineError};
use crate::generation::prompts::{fill_template, QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM};
use crate::generation::structured::{run_pipeline, StructuredGenerator};
use crate::generation::study_plan::{skill_lines, validate_job_analysis};
use crate::generation::validation::{check_question_count, StructuredOutput};
use crate::llm_client::prompts::with_output_contract;
use crate::models::{QuestionRequest, QuestionSet};

pub const MAX_QUESTION_COUNT: u32 = 20;

pub async fn generate_questions(
    generator: &StructuredGenerator,
    request: &QuestionRequest,
    cancel: &CancellationToken,
) -> Result<QuestionSet, PipelineError> {
    let operation = Operation::QuestionGeneration;

    run_pipeline(operation, async {
        validate_request(request)?;
        info!(
            "Generating {} questions for topic: {}",
            request.count,
            request.topic.trim()
        );

        let prompt = build_question_prompt(request);
        let set: QuestionSet = generator
            .generate(operation, QUESTION_SYSTEM, &prompt, cancel)
            .await?;

        for warning in check_question_count(&set, request.count).warnings {
            warn!("{} validation warning: {warning}", QuestionSet::SCHEMA_NAME);
        }
        info!("Generated {} questions", set.questions.len());
        Ok(set)
    })
    .await
}

fn validate_request(request: &QuestionRequest) -> Result<(), PipelineError> {
    if request.topic.trim().is_empty() {
        return Err(PipelineError::invalid("topic cannot be empty"));
    }
    if request.count == 0 || request.count > MAX_QUESTION_COUNT {
        return Err(PipelineError::invalid(format!(
            "count must be between 1 and {MAX_QUESTION_COUNT}, got {}",
            request.count
        )));
    }
    validate_job_analysis(&request.job_analysis)
}

pub fn build_question_prompt(request: &QuestionRequest) -> String {
    let analysis = &request.job_analysis;

    with_output_contract(&fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("role_title", analysis.role_title.trim()),
            ("experience_level", analysis.experience_level.as_str()),
            ("topic", request.topic.trim()),
            ("skills", skill_lines(analysis).as_str()),
            ("count", request.count.to_string().as_str()),
        ],
    ))
}
