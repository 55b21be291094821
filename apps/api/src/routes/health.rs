use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / and GET /api/health
/// Returns service status, version, and whether a model key is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "model": state.config.gemini_model,
        "llm_configured": state.config.gemini_api_key.is_some()
    }))
}
