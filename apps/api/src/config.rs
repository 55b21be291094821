use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Application configuration loaded from environment variables.
///
/// A missing `GEMINI_API_KEY` does not fail startup; the LLM client refuses
/// every call instead, so the service stays up for health checks.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub attempt_timeout: Duration,
    pub retry_backoff: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let attempt_timeout_secs = parse_or(
            &get,
            "LLM_ATTEMPT_TIMEOUT_SECS",
            DEFAULT_ATTEMPT_TIMEOUT_SECS,
        )?;
        if attempt_timeout_secs == 0 {
            bail!("LLM_ATTEMPT_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            attempt_timeout: Duration::from_secs(attempt_timeout_secs),
            retry_backoff: Duration::from_millis(parse_or(
                &get,
                "LLM_RETRY_BACKOFF_MS",
                DEFAULT_RETRY_BACKOFF_MS,
            )?),
            port: parse_or(&get, "PORT", 8000u16)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
