/// LLM Client: the single point of entry for all model calls in PrepCoach.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Pipelines depend on the `StructuredModel` trait only; `GeminiClient` is the
/// production implementation, constructed once at startup and shared.
///
/// One call = one HTTP request. Retries belong to `generation::structured`.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM response blocked: {reason}")]
    Blocked { reason: String },
}

impl LlmError {
    /// Whether an unmodified retry could plausibly succeed.
    ///
    /// Credential and request-shape rejections (400/401/403/404) and a missing
    /// key are fatal; everything else is transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::MissingApiKey => false,
            LlmError::Http(e) => !e.is_builder(),
            LlmError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
                    || *status == StatusCode::REQUEST_TIMEOUT.as_u16()
                    || *status >= 500
            }
            LlmError::Parse(_) | LlmError::EmptyContent | LlmError::Blocked { .. } => true,
        }
    }
}

/// Everything the model needs for one structured call.
#[derive(Debug, Clone, Copy)]
pub struct StructuredPrompt<'a> {
    pub system: &'a str,
    pub instruction: &'a str,
    /// Name of the result schema, used for logging.
    pub schema_name: &'a str,
    /// Response schema in the provider's OpenAPI subset.
    pub response_schema: &'a Value,
}

/// The "generate structured output from prompt" capability.
///
/// Implementations must be safe for concurrent use and keep no conversation
/// state between calls.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Returns the raw JSON text produced for `prompt`. Callers decode and
    /// validate it.
    async fn generate(&self, prompt: StructuredPrompt<'_>) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or the reason there is none.
    pub fn text(&self) -> Result<String, LlmError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked { reason });
        }

        let candidate = self.candidates.first().ok_or(LlmError::EmptyContent)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST")) => Err(LlmError::Blocked {
                    reason: reason.to_string(),
                }),
                _ => Err(LlmError::EmptyContent),
            };
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. Cheap to clone; holds read-only
/// configuration only.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()?,
            api_key,
            api_base: api_base.into(),
            model: model.into(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl StructuredModel for GeminiClient {
    async fn generate(&self, prompt: StructuredPrompt<'_>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "LLM call for {} succeeded: prompt_tokens={}, output_tokens={}",
                prompt.schema_name, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        let text = body.text()?;
        Ok(strip_json_fences(&text).to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn build_request_body<'a>(prompt: &StructuredPrompt<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: prompt.system,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: prompt.instruction,
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: prompt.response_schema,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"role_title\": \"SRE\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"role_title\": \"SRE\"}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```\n{\"score\": 40}";
        assert_eq!(strip_json_fences(input), "{\"score\": 40}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_retry_classification() {
        let transient = [429u16, 408, 500, 503];
        for status in transient {
            let err = LlmError::Api {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "status {status} should be retryable");
        }

        let fatal = [400u16, 401, 403, 404];
        for status in fatal {
            let err = LlmError::Api {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "status {status} should be fatal");
        }

        assert!(!LlmError::MissingApiKey.is_retryable());
        assert!(LlmError::EmptyContent.is_retryable());
        assert!(LlmError::Blocked {
            reason: "SAFETY".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_request_body_uses_gemini_field_names() {
        let schema = json!({"type": "OBJECT"});
        let prompt = StructuredPrompt {
            system: "You are a coach.",
            instruction: "Evaluate this.",
            schema_name: "AnswerEvaluation",
            response_schema: &schema,
        };

        let body = serde_json::to_value(build_request_body(&prompt)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a coach.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Evaluate this.");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"score\":"}, {"text": " 70}"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
        }))
        .unwrap();

        assert_eq!(body.text().unwrap(), "{\"score\": 70}");
        assert_eq!(body.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_is_empty_content() {
        let body: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(body.text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_blocked_prompt_is_reported() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(body.text(), Err(LlmError::Blocked { reason }) if reason == "SAFETY"));
    }

    #[test]
    fn test_safety_finish_without_text_is_blocked() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(body.text(), Err(LlmError::Blocked { .. })));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = GeminiClient::new(None, "http://127.0.0.1:9", "gemini-1.5-flash").unwrap();
        let schema = json!({"type": "OBJECT"});
        let result = client
            .generate(StructuredPrompt {
                system: "s",
                instruction: "i",
                schema_name: "JobAnalysis",
                response_schema: &schema,
            })
            .await;

        assert!(matches!(result, Err(LlmError::MissingApiKey)));
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(
            Some("k".into()),
            "https://generativelanguage.googleapis.com/v1beta",
            "gemini-1.5-flash",
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
