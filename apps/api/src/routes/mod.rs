pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze-job", post(handlers::handle_analyze_job))
        .route(
            "/api/generate-study-plan",
            post(handlers::handle_generate_study_plan),
        )
        .route(
            "/api/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route("/api/evaluate-answer", post(handlers::handle_evaluate_answer))
        .with_state(state)
}
