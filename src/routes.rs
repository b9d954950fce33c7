use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    completion::CompletionProvider,
    errors::ApiError,
    models::{Envelope, Mode, ProductivityRequest},
    normalizer::normalize,
    prompts::{build_prompt, SYSTEM_INSTRUCTION},
};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/productivity", post(productivity))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub industry: String,
    pub description: String,
    pub mode: Mode,
}

/// Text of a request field, or `None` when it is falsy (missing, `null`,
/// `false`, `0` or `""`). Other scalars are taken in their JSON text form;
/// arrays and objects carry no usable text and count as absent.
fn field_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Checks presence of all three fields before the mode value itself.
pub fn validate(request: ProductivityRequest) -> Result<ValidRequest, ApiError> {
    let (Some(industry), Some(description), Some(mode)) =
        (field_text(request.industry), field_text(request.description), field_text(request.mode))
    else {
        return Err(ApiError::Validation);
    };
    let mode = mode.parse::<Mode>().map_err(|e| ApiError::UnsupportedMode(e.0))?;
    Ok(ValidRequest { industry, description, mode })
}

/// POST /api/productivity
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn productivity(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, ApiError> {
    if !state.provider.is_configured() {
        return Err(ApiError::Config);
    }

    let request: ProductivityRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadBody(e.to_string()))?;
    let ValidRequest { industry, description, mode } = validate(request)?;

    info!(%mode, industry = %industry, "🚀 Productivity request");

    let prompt = build_prompt(&industry, &description, mode);
    let raw = state.provider.complete(SYSTEM_INSTRUCTION, &prompt).await?;

    let data = normalize(&raw, mode).map_err(|e| {
        tracing::error!("Unrecoverable model output ({e}): {raw}");
        ApiError::from(e)
    })?;

    info!(%mode, "✅ Productivity response ready");
    Ok(Json(Envelope::ok(data)))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
