//! Job analysis pipeline: extracts role, level, ranked skills, and difficulty
//! from a raw job description.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::generation::error::{Operation, PipelineError};
use crate::generation::prompts::{fill_template, JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_SYSTEM};
use crate::generation::structured::{run_pipeline, StructuredGenerator};
use crate::llm_client::prompts::with_output_contract;
use crate::models::{JobAnalysis, JobAnalysisRequest};

/// Longest job description accepted, in characters.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 20_000;

/// Analyzes a job description and returns a schema-valid `JobAnalysis`.
pub async fn analyze_job(
    generator: &StructuredGenerator,
    request: &JobAnalysisRequest,
    cancel: &CancellationToken,
) -> Result<JobAnalysis, PipelineError> {
    let operation = Operation::JobAnalysis;

    run_pipeline(operation, async {
        validate_request(request)?;
        info!(
            "Analyzing job description ({} chars)",
            request.job_description.chars().count()
        );

        let prompt = build_job_analysis_prompt(request);
        let analysis: JobAnalysis = generator
            .generate(operation, JOB_ANALYSIS_SYSTEM, &prompt, cancel)
            .await?;

        info!(
            "Job analysis completed: {} ({}, {} skills)",
            analysis.role_title,
            analysis.experience_level,
            analysis.key_skills.len()
        );
        Ok(analysis)
    })
    .await
}

fn validate_request(request: &JobAnalysisRequest) -> Result<(), PipelineError> {
    if request.job_description.trim().is_empty() {
        return Err(PipelineError::invalid("job_description cannot be empty"));
    }
    let chars = request.job_description.chars().count();
    if chars > MAX_JOB_DESCRIPTION_CHARS {
        return Err(PipelineError::invalid(format!(
            "job_description is {chars} characters; the limit is {MAX_JOB_DESCRIPTION_CHARS}"
        )));
    }
    Ok(())
}

pub fn build_job_analysis_prompt(request: &JobAnalysisRequest) -> String {
    with_output_contract(&fill_template(
        JOB_ANALYSIS_PROMPT_TEMPLATE,
        &[("job_description", request.job_description.trim())],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::{generator_for, sample_job_analysis_json, ScriptedModel, Step};
    use crate::models::{SkillCategory, SkillImportance};

    const JD: &str = r#"
        Senior Backend Engineer, Payments
        You will own our ledger services written in Rust and drive reliability.
        Required: 5+ years backend experience, Rust, PostgreSQL, distributed systems.
        Nice to have: Kafka, Kubernetes.
    "#;

    fn request(text: &str) -> JobAnalysisRequest {
        JobAnalysisRequest {
            job_description: text.to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_trimmed_description() {
        let prompt = build_job_analysis_prompt(&request(JD));
        assert!(prompt.contains("JOB DESCRIPTION:\nSenior Backend Engineer, Payments"));
        assert!(prompt.ends_with("Do NOT include explanations outside the JSON object."));
    }

    #[test]
    fn test_description_with_braces_is_kept_verbatim() {
        let prompt = build_job_analysis_prompt(&request("Templates like {job_description} and {name}"));
        assert!(prompt.contains("JOB DESCRIPTION:\nTemplates like {job_description} and {name}"));
    }

    #[tokio::test]
    async fn test_analyze_returns_populated_analysis() {
        let model = ScriptedModel::always(Step::reply(sample_job_analysis_json()));
        let analysis = analyze_job(&generator_for(&model), &request(JD), &CancellationToken::new())
            .await
            .unwrap();

        assert!(!analysis.role_title.is_empty());
        assert!(!analysis.summary.is_empty());
        assert!(!analysis.key_skills.is_empty());
        assert_eq!(analysis.key_skills[0].importance, SkillImportance::Critical);
        assert_eq!(analysis.key_skills[2].category, SkillCategory::SoftSkill);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_description_is_rejected_before_any_call() {
        let model = ScriptedModel::always(Step::reply(sample_job_analysis_json()));
        let err = analyze_job(&generator_for(&model), &request("  \n "), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RequestInvalid(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_description_is_rejected() {
        let model = ScriptedModel::always(Step::reply(sample_job_analysis_json()));
        let huge = "x".repeat(MAX_JOB_DESCRIPTION_CHARS + 1);
        let err = analyze_job(&generator_for(&model), &request(&huge), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("limit"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skills_outside_enumeration_end_in_generation_failed() {
        let mut raw = sample_job_analysis_json();
        raw["key_skills"][0]["category"] = serde_json::json!("Leadership");
        let model = ScriptedModel::always(Step::reply(raw));

        let err = analyze_job(&generator_for(&model), &request(JD), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::GenerationFailed {
                operation: Operation::JobAnalysis,
                attempts: 3,
                ..
            }
        ));
    }
}
