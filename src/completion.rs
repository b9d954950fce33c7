use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;

pub const TEMPERATURE: f32 = 0.7;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

/// Exponential backoff before retry number `attempt` (1-based), capped at
/// `RETRY_MAX_DELAY`.
fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .checked_mul(1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX))
        .map_or(RETRY_MAX_DELAY, |delay| delay.min(RETRY_MAX_DELAY))
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion provider API key is not configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unreadable provider response: {0}")]
    Parse(String),
}

impl GatewayError {
    fn is_transient(&self) -> bool {
        match self {
            GatewayError::Http(_) => true,
            GatewayError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            GatewayError::MissingApiKey | GatewayError::Parse(_) => false,
        }
    }
}

/// Opaque text-completion function: `(system, prompt) -> text`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Whether credentials are present. Checked before any request work.
    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GatewayError>;
}

/// Chat-completions client (OpenAI wire format).
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_retries: u32,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn perform_api_call(&self, api_key: &str, body: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self.client.post(&url).bearer_auth(api_key).json(body).send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&response_text)
                .map(|e| e.error.message)
                .unwrap_or(response_text);
            return Err(GatewayError::Api { status: status.as_u16(), message });
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(parsed.first_content().unwrap_or_default())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: TEMPERATURE,
        };

        info!(model = %self.model, prompt_chars = prompt.len(), "🔗 Requesting completion");

        let mut attempt = 0;
        loop {
            match self.perform_api_call(api_key, &body).await {
                Ok(text) => {
                    info!(chars = text.len(), attempt, "📥 Completion received");
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = retry_delay(attempt);
                    warn!("Completion attempt {} failed ({}), retrying in {}ms", attempt, e, delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("❌ Completion failed after {} attempt(s): {}", attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}
