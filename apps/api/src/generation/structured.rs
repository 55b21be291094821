//! Structured Generator: the only retry boundary in the pipelines.
//!
//! Each attempt sends the same prompt, waits at most `attempt_timeout`, then
//! decodes and validates the reply. Attempts end in one of three tagged
//! outcomes: success, retryable failure, or fatal failure. Retryable failures
//! loop until the attempt budget is spent; fatal ones surface at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::generation::error::{AttemptFailure, Operation, PipelineError};
use crate::generation::validation::{decode_and_validate, StructuredOutput};
use crate::llm_client::{LlmError, StructuredModel, StructuredPrompt};

/// Retries after the first attempt. Three attempts in total.
pub const MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub attempt_timeout: Duration,
    /// Delay before the first retry; doubled for each retry after that.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(attempt_timeout: Duration, backoff_base: Duration) -> Self {
        Self {
            max_retries: MAX_RETRIES,
            attempt_timeout,
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before the given 1-based attempt.
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.backoff_base.saturating_mul(1 << (attempt - 2).min(16))
    }
}

enum AttemptOutcome<T> {
    Success(T),
    Retryable(AttemptFailure),
    Fatal(LlmError),
}

/// Shared handle to the model capability plus the retry policy. Cloning is
/// cheap; every clone talks to the same model.
#[derive(Clone)]
pub struct StructuredGenerator {
    model: Arc<dyn StructuredModel>,
    policy: RetryPolicy,
}

impl StructuredGenerator {
    pub fn new(model: Arc<dyn StructuredModel>, policy: RetryPolicy) -> Self {
        Self { model, policy }
    }

    /// Produces a schema-valid `T` for `instruction`, or fails.
    ///
    /// Stops scheduling attempts as soon as `cancel` fires; an attempt already
    /// in flight is dropped.
    pub async fn generate<T: StructuredOutput>(
        &self,
        operation: Operation,
        system: &str,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<T, PipelineError> {
        let schema = T::response_schema();
        let prompt = StructuredPrompt {
            system,
            instruction,
            schema_name: T::SCHEMA_NAME,
            response_schema: &schema,
        };
        let max_attempts = self.policy.max_attempts();

        let mut attempt = 0;
        loop {
            attempt += 1;
            let backoff = self.policy.backoff_before(attempt);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("{operation}: cancelled before attempt {attempt}/{max_attempts} completed");
                    return Err(PipelineError::Cancelled {
                        operation,
                        attempts: attempt - 1,
                    });
                }
                outcome = async {
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                    self.attempt::<T>(prompt).await
                } => outcome,
            };

            match outcome {
                AttemptOutcome::Success(value) => {
                    if attempt > 1 {
                        info!(
                            "{operation}: {} succeeded on attempt {attempt}/{max_attempts}",
                            T::SCHEMA_NAME
                        );
                    }
                    return Ok(value);
                }
                AttemptOutcome::Fatal(source) => {
                    error!("{operation}: non-retryable provider error: {source}");
                    return Err(PipelineError::ProviderFatal { operation, source });
                }
                AttemptOutcome::Retryable(failure) if attempt >= max_attempts => {
                    return Err(PipelineError::GenerationFailed {
                        operation,
                        attempts: attempt,
                        last_cause: failure,
                    });
                }
                AttemptOutcome::Retryable(failure) => {
                    warn!(
                        "{operation}: attempt {attempt}/{max_attempts} failed, retrying: {failure}"
                    );
                }
            }
        }
    }

    async fn attempt<T: StructuredOutput>(&self, prompt: StructuredPrompt<'_>) -> AttemptOutcome<T> {
        let reply = tokio::time::timeout(self.policy.attempt_timeout, self.model.generate(prompt)).await;

        match reply {
            Err(_elapsed) => {
                AttemptOutcome::Retryable(AttemptFailure::Timeout(self.policy.attempt_timeout))
            }
            Ok(Err(e)) if e.is_retryable() => AttemptOutcome::Retryable(AttemptFailure::Provider(e)),
            Ok(Err(e)) => AttemptOutcome::Fatal(e),
            Ok(Ok(raw)) => match decode_and_validate::<T>(&raw) {
                Ok(value) => AttemptOutcome::Success(value),
                Err(failure) => AttemptOutcome::Retryable(failure),
            },
        }
    }
}

/// Runs one pipeline call inside its own span and logs any failure before
/// handing it back.
pub(crate) async fn run_pipeline<T, F>(operation: Operation, body: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    let span = info_span!("pipeline", operation = %operation, request_id = %Uuid::new_v4());

    async move {
        let result = body.await;
        if let Err(e) = &result {
            match e {
                PipelineError::RequestInvalid(_) => warn!("{operation} rejected: {e}"),
                _ => error!("{operation} failed: {e}"),
            }
        }
        result
    }
    .instrument(span)
    .await
}
