//! Connection settings for the model endpoints.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a local model server (Ollama).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// Base URL of the local server, e.g. "http://localhost:11434".
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl LocalLlmConfig {
    /// Create a new local LLM configuration.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_timeout(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for a remote, credentialed model endpoint.
///
/// The credential itself is not stored here: it is passed with each request,
/// so a key configured mid-session takes effect on the next call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    /// Base URL for the API.
    ///
    /// Examples:
    /// - Gaia Network (Qwen): "https://qwen72b.gaia.domains/v1"
    /// - Replicate: "https://api.replicate.com/v1"
    /// - Same-origin proxy: "http://localhost:3000/api"
    pub base_url: String,

    /// Model name, or model version for Replicate.
    pub model: String,

    /// Header carrying the credential. `None` means `Authorization: Bearer`.
    ///
    /// Proxies expect a custom header (e.g. `X-Gemini-API-Key`) and rewrite it
    /// to the provider's `Authorization` header server-side.
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Base URLs tried in order after `base_url` fails.
    #[serde(default)]
    pub fallback_urls: Vec<String>,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl RemoteLlmConfig {
    /// Create a new remote LLM configuration.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            auth_header: None,
            fallback_urls: Vec::new(),
            timeout: default_timeout(),
        }
    }

    /// Send the credential in a custom header instead of `Authorization`.
    pub fn with_auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self
    }

    /// Add a base URL to try when the previous ones fail.
    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_urls.push(url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// All base URLs in the order they should be attempted.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_url.as_str()).chain(self.fallback_urls.iter().map(String::as_str))
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}
