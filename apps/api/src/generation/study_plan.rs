//! Study plan pipeline: turns a job analysis and a weekly time budget into a
//! prioritised plan of topics and resources.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::generation::error::{Operation, PipelineError};
use crate::generation::prompts::{
    bullet_lines, fill_template, STUDY_PLAN_PROMPT_TEMPLATE, STUDY_PLAN_SYSTEM,
};
use crate::generation::structured::{run_pipeline, StructuredGenerator};
use crate::generation::validation::StructuredOutput;
use crate::llm_client::prompts::with_output_contract;
use crate::models::{JobAnalysis, StudyPlan, StudyPlanRequest};

pub async fn generate_study_plan(
    generator: &StructuredGenerator,
    request: &StudyPlanRequest,
    cancel: &CancellationToken,
) -> Result<StudyPlan, PipelineError> {
    let operation = Operation::StudyPlan;

    run_pipeline(operation, async {
        validate_request(request)?;
        info!(
            "Generating study plan for {} ({} hours/week)",
            request.job_analysis.role_title, request.available_time_hours
        );

        let prompt = build_study_plan_prompt(request);
        let plan: StudyPlan = generator
            .generate(operation, STUDY_PLAN_SYSTEM, &prompt, cancel)
            .await?;

        info!(
            "Study plan generated with {} topics ({} hours total)",
            plan.topics.len(),
            plan.total_duration_hours
        );
        Ok(plan)
    })
    .await
}

fn validate_request(request: &StudyPlanRequest) -> Result<(), PipelineError> {
    let hours = request.available_time_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(PipelineError::invalid(format!(
            "available_time_hours must be greater than zero, got {hours}"
        )));
    }
    validate_job_analysis(&request.job_analysis)
}

/// Rejects a caller-supplied analysis that would not pass as a pipeline
/// result.
pub(crate) fn validate_job_analysis(analysis: &JobAnalysis) -> Result<(), PipelineError> {
    let report = analysis.validate();
    if report.is_valid() {
        Ok(())
    } else {
        Err(PipelineError::invalid(format!(
            "job_analysis is incomplete: {}",
            report.errors.join("; ")
        )))
    }
}

/// Lists skills in the analysis order, one bullet per skill.
pub(crate) fn skill_lines(analysis: &JobAnalysis) -> String {
    bullet_lines(
        analysis
            .key_skills
            .iter()
            .map(|s| format!("{} ({}, {})", s.name.trim(), s.importance, s.category)),
    )
}

pub fn build_study_plan_prompt(request: &StudyPlanRequest) -> String {
    let analysis = &request.job_analysis;

    with_output_contract(&fill_template(
        STUDY_PLAN_PROMPT_TEMPLATE,
        &[
            ("role_title", analysis.role_title.trim()),
            ("experience_level", analysis.experience_level.as_str()),
            ("difficulty_level", analysis.difficulty_level.as_str()),
            ("available_time_hours", request.available_time_hours.to_string().as_str()),
            ("skills", skill_lines(analysis).as_str()),
        ],
    ))
}
