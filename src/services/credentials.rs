// src/services/credentials.rs
//! Where each hosting surface keeps its API key.

use serde_json::Value;
use tracing::warn;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Generic HTTP function host; key in the `GEMINI_KEY` variable.
    HttpFunction,
    /// Managed function platform; key under `gemini.key` in the runtime config.
    CloudFunction,
}

impl Binding {
    pub fn name(self) -> &'static str {
        match self {
            Binding::HttpFunction => "http-function",
            Binding::CloudFunction => "cloud-function",
        }
    }

    /// Shown to the end user in place of a reply when no key is configured.
    pub fn missing_key_hint(self) -> &'static str {
        match self {
            Binding::HttpFunction => {
                "⚠️ GEMINI_KEY not set. Go to your host's Settings → Environment Variables → add GEMINI_KEY"
            }
            Binding::CloudFunction => {
                "⚠️ Gemini API key not found. Set gemini.key in the function runtime config (CLOUD_RUNTIME_CONFIG)"
            }
        }
    }

    pub fn resolve_key(self, cfg: &Config) -> Option<String> {
        match self {
            Binding::HttpFunction => cfg.gemini_key.clone(),
            Binding::CloudFunction => cfg
                .cloud_runtime_config
                .as_deref()
                .and_then(load_runtime_config)
                .and_then(|v| runtime_config_key(&v)),
        }
    }
}

/// Accepts either inline JSON or a path to a JSON file.
fn load_runtime_config(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    let text = if raw.starts_with('{') {
        raw.to_owned()
    } else {
        match std::fs::read_to_string(raw) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = raw, error = %e, "cannot read runtime config");
                return None;
            }
        }
    };

    serde_json::from_str(&text)
        .inspect_err(|e| warn!(error = %e, "runtime config is not valid JSON"))
        .ok()
}

fn runtime_config_key(config: &Value) -> Option<String> {
    config
        .pointer("/gemini/key")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
}
