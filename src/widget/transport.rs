// src/widget/transport.rs
//! How the widget reaches the relay.

use std::future::Future;

use crate::message::ChatResponse;

/// What came back from one relay call, before the widget decides what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReply {
    /// 2xx; `None` when the body carried no usable `reply`.
    Ok(Option<String>),
    /// Non-2xx, with the raw body for logging.
    Status { status: u16, body: String },
}

#[derive(Debug, thiserror::Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

pub trait RelayTransport: Send + Sync {
    fn send(&self, message: &str) -> impl Future<Output = Result<RelayReply, TransportError>> + Send;
}

/// Posts `{ "message": ... }` to a relay endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RelayTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<RelayReply, TransportError> {
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(RelayReply::Status {
                status: status.as_u16(),
                body,
            });
        }

        // A 2xx with an unreadable body counts as "no reply", not a network error.
        let reply = response
            .json::<ChatResponse>()
            .await
            .ok()
            .map(|r| r.reply)
            .filter(|r| !r.is_empty());
        Ok(RelayReply::Ok(reply))
    }
}
