// src/message.rs
use serde::{Deserialize, Serialize};

/// Body accepted by the relay. `message` stays a raw JSON value so that a
/// missing or wrong-typed field can be answered with a 400 of our own.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}
