//! Runtime configuration.
//!
//! The content-service settings are the only process-wide state and are
//! read-only once built. They can come from JSON (via serde) or from the
//! environment.

use std::time::Duration;

use serde::Deserialize;

pub const ENV_ENDPOINT: &str = "WORKSHEET_AI_ENDPOINT";
pub const ENV_MODEL: &str = "WORKSHEET_AI_MODEL";
pub const ENV_KEY: &str = "WORKSHEET_AI_KEY";
pub const ENV_TIMEOUT: &str = "WORKSHEET_AI_TIMEOUT_SECS";

/// Remote content service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of an OpenAI-compatible server (e.g. "http://localhost:8000")
    pub endpoint: String,

    /// Model name passed through to the server
    pub model: String,

    /// Bearer credential; omitted from requests when `None`
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.7,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by any `WORKSHEET_AI_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            config.model = model;
        }
        config.api_key = lookup(ENV_KEY).filter(|k| !k.trim().is_empty());
        if let Some(secs) = lookup(ENV_TIMEOUT).and_then(|s| s.trim().parse().ok()) {
            config.timeout_secs = secs;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Worksheet export settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Blank border added on every side of the page, in pixels
    pub margin_px: u32,

    /// Supersampling factor for rasterization
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { margin_px: 20, scale: 2.0 }
    }
}
