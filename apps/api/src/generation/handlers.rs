//! Axum route handlers for the preparation pipelines.
//!
//! Each handler owns a cancellation token for the lifetime of the request.
//! When the client disconnects axum drops the handler future, the guard fires,
//! and the pipeline stops before its next attempt.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tokio_util::sync::CancellationToken;

use crate::errors::AppError;
use crate::generation::evaluation::evaluate_answer;
use crate::generation::job_analysis::analyze_job;
use crate::generation::questions::generate_questions;
use crate::generation::study_plan::generate_study_plan;
use crate::models::{
    AnswerEvaluation, EvaluationRequest, JobAnalysis, JobAnalysisRequest, QuestionRequest,
    QuestionSet, StudyPlan, StudyPlanRequest,
};
use crate::state::AppState;

/// POST /api/analyze-job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    payload: Result<Json<JobAnalysisRequest>, JsonRejection>,
) -> Result<Json<JobAnalysis>, AppError> {
    let Json(request) = payload?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let analysis = analyze_job(&state.generator, &request, &cancel).await?;
    Ok(Json(analysis))
}

/// POST /api/generate-study-plan
pub async fn handle_generate_study_plan(
    State(state): State<AppState>,
    payload: Result<Json<StudyPlanRequest>, JsonRejection>,
) -> Result<Json<StudyPlan>, AppError> {
    let Json(request) = payload?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let plan = generate_study_plan(&state.generator, &request, &cancel).await?;
    Ok(Json(plan))
}

/// POST /api/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionSet>, AppError> {
    let Json(request) = payload?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let questions = generate_questions(&state.generator, &request, &cancel).await?;
    Ok(Json(questions))
}

/// POST /api/evaluate-answer
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<AnswerEvaluation>, AppError> {
    let Json(request) = payload?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let evaluation = evaluate_answer(&state.generator, &request, &cancel).await?;
    Ok(Json(evaluation))
}
