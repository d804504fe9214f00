// src/routes/relay.rs
//! One thin adapter per hosting surface around [`services::relay::handle`].
//!
//! [`services::relay::handle`]: crate::services::relay::handle

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::Method,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::{
    error::AppError,
    services::{credentials::Binding, relay},
    state::SharedState,
};

pub async fn http_function(
    State(state): State<SharedState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    relay_with(state, Binding::HttpFunction, method, body).await
}

pub async fn cloud_function(
    State(state): State<SharedState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    relay_with(state, Binding::CloudFunction, method, body).await
}

async fn relay_with(
    state: SharedState,
    binding: Binding,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let span = info_span!(
        "relay",
        request_id = %Uuid::new_v4(),
        binding = binding.name(),
        method = %method,
    );

    async move {
        // An oversized or broken body still gets a JSON answer.
        let body = match body {
            Ok(body) => body,
            Err(rejection) => return AppError::from(rejection).into_response(),
        };

        match relay::handle(&method, &body, state.relay_config(binding), &state.upstream).await {
            Ok(outcome) => {
                info!("relay answered");
                outcome.into_response()
            }
            // Logged by `AppError::into_response`, inside this span.
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}
