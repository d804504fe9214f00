// src/services/relay.rs
//! The relay itself, independent of any hosting surface.
//!
//! [`handle`] takes the request method and raw body, the configuration the
//! binding resolved up front, and an upstream client. It never panics and
//! never lets a failure escape as anything other than an [`AppError`].

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::message::{ChatRequest, ChatResponse};
use crate::services::credentials::Binding;
use crate::services::extract::extract_reply;
use crate::services::gemini::UpstreamClient;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub binding: Binding,
    pub api_key: Option<String>,
}

impl RelayConfig {
    pub fn for_binding(binding: Binding, cfg: &Config) -> Self {
        Self {
            binding,
            api_key: binding.resolve_key(cfg),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Answer to a CORS preflight: 204, no body.
    Preflight,
    Reply(ChatResponse),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Preflight => StatusCode::NO_CONTENT.into_response(),
            Outcome::Reply(reply) => Json(reply).into_response(),
        }
    }
}

pub async fn handle<C: UpstreamClient>(
    method: &Method,
    body: &[u8],
    config: &RelayConfig,
    client: &C,
) -> Result<Outcome, AppError> {
    if *method == Method::OPTIONS {
        return Ok(Outcome::Preflight);
    }
    if *method != Method::POST {
        return Err(AppError::MethodNotAllowed(method.to_string()));
    }

    let message = parse_message(body)?;

    let Some(api_key) = config.api_key.as_deref() else {
        warn!(binding = config.binding.name(), "Gemini API key missing");
        return Ok(reply(config.binding.missing_key_hint()));
    };

    let upstream = client.generate(api_key, &message).await?;
    if !upstream.is_success() {
        return Err(AppError::Upstream {
            status: upstream.status,
            details: upstream.body,
        });
    }

    let data: Value = serde_json::from_str(&upstream.body)
        .map_err(|e| AppError::Internal(format!("upstream body is not JSON: {e}")))?;
    let text = extract_reply(&data);
    debug!(chars = text.chars().count(), "reply extracted");

    Ok(reply(text))
}

/// Returns the trimmed message, or a 400 describing what is wrong with it.
pub fn parse_message(body: &[u8]) -> Result<String, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ChatRequest::default()
    } else {
        serde_json::from_slice::<ChatRequest>(body)
            .map_err(|e| AppError::BadRequest(format!("Body must be a JSON object: {e}")))?
    };

    match request.message {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(AppError::BadRequest("'message' must not be blank".to_owned()))
            } else {
                Ok(trimmed.to_owned())
            }
        }
        _ => Err(AppError::BadRequest(
            "Missing 'message' string in body".to_owned(),
        )),
    }
}

fn reply(text: impl Into<String>) -> Outcome {
    Outcome::Reply(ChatResponse { reply: text.into() })
}
