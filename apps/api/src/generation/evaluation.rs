//! Answer evaluation pipeline: scores a practice answer against the key
//! points a strong answer should cover.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::generation::error::{Operation, PipelineError};
use crate::generation::prompts::{
    bullet_lines, fill_template, EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM,
};
use crate::generation::structured::{run_pipeline, StructuredGenerator};
use crate::llm_client::prompts::with_output_contract;
use crate::models::{AnswerEvaluation, EvaluationRequest};

pub async fn evaluate_answer(
    generator: &StructuredGenerator,
    request: &EvaluationRequest,
    cancel: &CancellationToken,
) -> Result<AnswerEvaluation, PipelineError> {
    let operation = Operation::AnswerEvaluation;

    run_pipeline(operation, async {
        validate_request(request)?;
        info!(
            "Evaluating answer ({} expected key points)",
            request.expected_key_points.len()
        );

        let prompt = build_evaluation_prompt(request);
        let evaluation: AnswerEvaluation = generator
            .generate(operation, EVALUATION_SYSTEM, &prompt, cancel)
            .await?;

        info!("Answer evaluated with score: {}", evaluation.score);
        Ok(evaluation)
    })
    .await
}

fn validate_request(request: &EvaluationRequest) -> Result<(), PipelineError> {
    if request.question.trim().is_empty() {
        return Err(PipelineError::invalid("question cannot be empty"));
    }
    if request.user_answer.trim().is_empty() {
        return Err(PipelineError::invalid("user_answer cannot be empty"));
    }
    if request.expected_key_points.iter().any(|p| p.trim().is_empty()) {
        return Err(PipelineError::invalid(
            "expected_key_points cannot contain empty entries",
        ));
    }
    Ok(())
}

pub fn build_evaluation_prompt(request: &EvaluationRequest) -> String {
    let key_points = if request.expected_key_points.is_empty() {
        "- (none provided; judge against what a strong answer would cover)".to_string()
    } else {
        bullet_lines(&request.expected_key_points)
    };

    with_output_contract(&fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("question", request.question.trim()),
            ("key_points", key_points.as_str()),
            ("user_answer", request.user_answer.trim()),
        ],
    ))
}
