use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Upper bound for `OPENAI_MAX_RETRIES`; larger values are clamped.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// Runtime configuration loaded from the environment (and `.env` if present).
///
/// The provider key is optional here: a missing key is reported per request as
/// a server configuration error rather than refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
            max_retries: 2,
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match non_empty("OPENAI_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>().context("OPENAI_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.request_timeout,
        };
        let max_retries = match non_empty("OPENAI_MAX_RETRIES") {
            Some(v) => v
                .parse::<u32>()
                .context("OPENAI_MAX_RETRIES must be a non-negative integer")?
                .min(MAX_RETRIES_LIMIT),
            None => defaults.max_retries,
        };
        let port = match non_empty("PORT") {
            Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        Ok(Config {
            api_key: non_empty("OPENAI_API_KEY"),
            api_base: non_empty("OPENAI_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            request_timeout,
            max_retries,
            port,
        })
    }
}
