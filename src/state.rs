// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::credentials::Binding;
use crate::services::gemini::GeminiClient;
use crate::services::relay::RelayConfig;

pub type SharedState = Arc<AppState>;

/// Immutable per-process state. Credentials are resolved once here, per
/// binding, and handed to the relay core on every request.
pub struct AppState {
    pub http_function: RelayConfig,
    pub cloud_function: RelayConfig,
    pub upstream: GeminiClient,
}

impl AppState {
    pub fn new(cfg: &Config, upstream: GeminiClient) -> Self {
        Self {
            http_function: RelayConfig::for_binding(Binding::HttpFunction, cfg),
            cloud_function: RelayConfig::for_binding(Binding::CloudFunction, cfg),
            upstream,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(cfg, GeminiClient::from_config(cfg)?))
    }

    pub fn relay_config(&self, binding: Binding) -> &RelayConfig {
        match binding {
            Binding::HttpFunction => &self.http_function,
            Binding::CloudFunction => &self.cloud_function,
        }
    }
}
