// Interview preparation pipelines.
// Job analysis, study plan, questions and answer evaluation all run through
// the structured generator; no handler calls the model client directly.

pub mod error;
pub mod evaluation;
pub mod handlers;
pub mod job_analysis;
pub mod prompts;
pub mod questions;
pub mod structured;
pub mod study_plan;
pub mod validation;

#[cfg(test)]
pub mod testing;
