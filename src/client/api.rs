use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{CompareResult, GenerateResult, Mode, ProductivityData};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success answer; carries the server's message or a per-mode default.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("response did not contain a usable result: {0}")]
    InvalidData(String),
}

impl ClientError {
    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Http(_) | ClientError::InvalidData(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Anything that can answer a productivity request for the client.
#[async_trait]
pub trait ProductivityBackend: Send + Sync {
    async fn fetch(&self, mode: Mode, industry: &str, description: &str) -> Result<ProductivityData, ClientError>;
}

/// HTTP client for `POST /api/productivity`.
#[derive(Clone)]
pub struct ProductivityApi {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ProductivityApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub async fn generate(&self, industry: &str, description: &str) -> Result<GenerateResult, ClientError> {
        match self.fetch(Mode::Generate, industry, description).await? {
            ProductivityData::Generate(result) => Ok(result),
            other => Err(ClientError::InvalidData(format!("expected a report, got {:?}", other.mode()))),
        }
    }

    pub async fn compare(&self, industry: &str, description: &str) -> Result<CompareResult, ClientError> {
        match self.fetch(Mode::Compare, industry, description).await? {
            ProductivityData::Compare(result) => Ok(result),
            other => Err(ClientError::InvalidData(format!("expected activities, got {:?}", other.mode()))),
        }
    }
}

fn default_failure(mode: Mode) -> &'static str {
    match mode {
        Mode::Generate => "Failed to generate.",
        Mode::Compare => "Failed to compare.",
    }
}

#[async_trait]
impl ProductivityBackend for ProductivityApi {
    async fn fetch(&self, mode: Mode, industry: &str, description: &str) -> Result<ProductivityData, ClientError> {
        let url = format!("{}/api/productivity", self.base_url);
        let body = serde_json::json!({
            "industry": industry,
            "description": description,
            "mode": mode,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let envelope: Option<RawEnvelope> = response.json().await.ok();

        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.message)
                .unwrap_or_else(|| default_failure(mode).to_string());
            tracing::warn!(%mode, status = status.as_u16(), "Productivity request failed: {message}");
            return Err(ClientError::Server { status: status.as_u16(), message });
        }

        let data = envelope
            .and_then(|e| e.data)
            .ok_or_else(|| ClientError::InvalidData("missing data".into()))?;

        let parsed = match mode {
            Mode::Generate => serde_json::from_value(data).map(ProductivityData::Generate),
            Mode::Compare => serde_json::from_value(data).map(ProductivityData::Compare),
        };
        parsed.map_err(|e| ClientError::InvalidData(e.to_string()))
    }
}
