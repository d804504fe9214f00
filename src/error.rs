// src/error.rs
//! Relay error taxonomy.
//!
//! Every relay failure ends up here and is rendered as a JSON body with a
//! status code by [`IntoResponse`]. A missing credential is not an error: it
//! is answered with a normal reply (see `services::credentials`).

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AppError {
    /// Anything other than `POST` or `OPTIONS`.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// The request body could not be read at all (too large, broken stream).
    #[error("unreadable body: {message}")]
    UnreadableBody { status: StatusCode, message: String },

    /// The request body did not carry a usable `message`.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream API answered with a non-success status.
    #[error("upstream returned {status}")]
    Upstream { status: u16, details: String },

    /// Transport failure or an upstream body that is not JSON.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UnreadableBody { status, .. } => *status,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            AppError::MethodNotAllowed(_) => json!({ "error": "Only POST allowed" }),
            AppError::UnreadableBody { message, .. } | AppError::BadRequest(message) => {
                json!({ "error": message })
            }
            AppError::Upstream { status, details } => json!({
                "error": "Gemini API error",
                "status": status,
                "details": details,
            }),
            AppError::Internal(m) => json!({
                "error": "Internal function error",
                "detail": m,
            }),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::UnreadableBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream { status, details } => {
                error!(status, details = %details, "Gemini API error");
            }
            AppError::Internal(m) => error!(error = %m, "relay failed"),
            AppError::UnreadableBody { status, message } => {
                warn!(%status, error = %message, "request body rejected");
            }
            _ => {}
        }
        (self.status(), Json(self.body())).into_response()
    }
}
