use crate::config::Config;
use crate::generation::structured::StructuredGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Bounded-retry generator shared by all four pipelines.
    pub generator: StructuredGenerator,
    pub config: Config,
}
