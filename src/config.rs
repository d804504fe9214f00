// src/config.rs
//! Relay configuration, read from the environment once at startup.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_address: String,

    /// Key for the `http-function` binding (`GEMINI_KEY`).
    pub gemini_key: Option<String>,

    /// Raw runtime config for the `cloud-function` binding: inline JSON or a
    /// path to a JSON file holding `{"gemini":{"key":"..."}}`.
    pub cloud_runtime_config: Option<String>,

    pub model: String,
    pub base_url: String,

    /// Raw `RELAY_UPSTREAM_TIMEOUT_SECS`; see [`Config::upstream_timeout`].
    pub upstream_timeout_secs: Option<String>,

    /// Directory the static site is served from.
    pub static_dir: String,

    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: String,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_owned(),
            gemini_key: None,
            cloud_runtime_config: None,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            upstream_timeout_secs: None,
            static_dir: "public".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("RELAY_BIND", &defaults.bind_address),
            gemini_key: non_empty_env("GEMINI_KEY"),
            cloud_runtime_config: non_empty_env("CLOUD_RUNTIME_CONFIG"),
            model: env_or("GEMINI_MODEL", &defaults.model),
            base_url: env_or("GEMINI_BASE_URL", &defaults.base_url),
            upstream_timeout_secs: non_empty_env("RELAY_UPSTREAM_TIMEOUT_SECS"),
            static_dir: env_or("RELAY_STATIC_DIR", &defaults.static_dir),
            log_level: env_or("RELAY_LOG", &defaults.log_level),
            log_json: std::env::var("RELAY_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Upstream request timeout. `None` (unset, `0` or unparsable) leaves the
    /// transport default in place.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        let raw = self.upstream_timeout_secs.as_deref()?;
        match raw.parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(e) => {
                warn!(value = raw, error = %e, "ignoring invalid RELAY_UPSTREAM_TIMEOUT_SECS");
                None
            }
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    non_empty_env(key).unwrap_or_else(|| default.to_owned())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
