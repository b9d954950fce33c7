use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::completion::GatewayError;
use crate::models::Envelope;
use crate::normalizer::MalformedOutput;

/// Endpoint-level error. Every variant maps to a fixed client message; detail
/// is only ever logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("completion provider credential is not configured")]
    Config,

    #[error("missing required fields")]
    Validation,

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("malformed request body: {0}")]
    BadBody(String),

    #[error("completion gateway failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("malformed model output: {0}")]
    Malformed(#[from] MalformedOutput),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation | ApiError::UnsupportedMode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            ApiError::Config => "Server configuration error.",
            ApiError::Validation => "Missing required fields.",
            ApiError::UnsupportedMode(_) => "Unsupported mode.",
            ApiError::BadBody(_) | ApiError::Gateway(_) => "Internal server error.",
            ApiError::Malformed(MalformedOutput::NoJsonObject) => "AI returned invalid JSON.",
            ApiError::Malformed(MalformedOutput::InvalidJson(_)) => "Failed to parse AI response.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation | ApiError::UnsupportedMode(_) => tracing::info!("Rejected request: {self}"),
            _ => tracing::error!("Request failed: {self}"),
        }
        (self.status(), Json(Envelope::error(self.client_message()))).into_response()
    }
}
