// src/services/gemini.rs
//! Upstream client for the Gemini `generateContent` endpoint.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;

/// Status and raw body of one upstream call. Interpreting the body is left to
/// the relay core.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait UpstreamClient: Send + Sync {
    /// Send `prompt` as a single-turn conversation. Errors only on transport
    /// failure; a non-success status is still `Ok`.
    fn generate(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<UpstreamResponse, AppError>> + Send;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&cfg.base_url, &cfg.model, cfg.upstream_timeout())
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl UpstreamClient for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<UpstreamResponse, AppError> {
        let payload = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, "calling Gemini");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}
