//! Configuration schema for AxiosChat

use crate::executor::DEFAULT_LATENCY;
use crate::pipeline::{GenerationSettings, ResolverSettings};
use crate::session::SessionOptions;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// Directory under the home directory holding user-level files.
pub const CONFIG_DIR: &str = ".axioschat";
pub const CONFIG_FILE: &str = "axioschat.toml";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

pub const DEFAULT_GAIA_URL: &str = "https://qwen72b.gaia.domains/v1";
pub const DEFAULT_GAIA_MODEL: &str = "qwen72b";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_REPLICATE_URL: &str = "https://api.replicate.com/v1";

static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Main AxiosChat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AxiosConfig {
    /// Conversational model
    pub conversation: ConversationConfig,

    /// Tool-resolution model
    pub resolver: ResolverConfig,

    /// Function executor
    pub executor: ExecutorConfig,

    /// Credential storage
    pub credentials: CredentialsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Session behaviour
    pub session: SessionConfig,
}

/// Which backend serves the conversational model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationProvider {
    /// Gaia Network node speaking the OpenAI wire format
    #[default]
    Gaia,
    /// Local Ollama server
    Ollama,
}

impl fmt::Display for ConversationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationProvider::Gaia => f.write_str("gaia"),
            ConversationProvider::Ollama => f.write_str("ollama"),
        }
    }
}

/// Conversational model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    pub provider: ConversationProvider,

    /// API base URL
    pub base_url: String,

    pub model: String,

    /// Temperature for generation (0.0-1.0)
    pub temperature: f64,

    pub top_p: f64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Custom header carrying the key, for proxies (e.g. "X-Gemini-API-Key")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,

    /// Base URLs tried in order after `base_url` fails
    pub fallback_urls: Vec<String>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            provider: ConversationProvider::Gaia,
            base_url: DEFAULT_GAIA_URL.to_string(),
            model: DEFAULT_GAIA_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 2000,
            auth_header: None,
            fallback_urls: Vec::new(),
            timeout_secs: 60,
        }
    }
}

impl ConversationConfig {
    /// Switch to a local Ollama server, optionally at `endpoint`.
    pub fn use_local(&mut self, endpoint: Option<String>) {
        if self.provider != ConversationProvider::Ollama {
            self.base_url = DEFAULT_OLLAMA_URL.to_string();
            self.model = DEFAULT_OLLAMA_MODEL.to_string();
            self.auth_header = None;
            self.fallback_urls.clear();
        }
        self.provider = ConversationProvider::Ollama;
        if let Some(endpoint) = endpoint {
            self.base_url = endpoint.trim_end_matches('/').to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature as f32,
            top_p: self.top_p as f32,
            max_tokens: Some(self.max_tokens),
        }
    }
}

/// Tool-resolution model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Replicate API base URL
    pub base_url: String,

    /// Model version hash
    pub version: String,

    pub temperature: f64,

    pub top_p: f64,

    pub max_new_tokens: u32,

    /// Retries when a cold model returns no output
    pub max_retries: usize,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REPLICATE_URL.to_string(),
            version: llm::remote::FLOCK_WEB3_VERSION.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_new_tokens: 2000,
            max_retries: 2,
            timeout_secs: 120,
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settings(&self) -> ResolverSettings {
        ResolverSettings {
            temperature: self.temperature as f32,
            top_p: self.top_p as f32,
            max_new_tokens: self.max_new_tokens,
        }
    }
}

/// Executor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Simulated latency of the mock executor in milliseconds
    pub latency_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY.as_millis() as u64,
        }
    }
}

impl ExecutorConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Credential storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Credential file path (relative to ~/.axioschat or absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,

    /// Log format: "compact", "pretty", "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Show function result messages in the conversation
    pub debug: bool,
}

impl AxiosConfig {
    /// Resolve environment variables in configuration values
    ///
    /// Supports ${VAR_NAME} syntax anywhere in string fields. Unset
    /// variables are left as written.
    pub fn resolve_env_vars(&mut self) {
        self.resolve_env_vars_with(|name| std::env::var(name).ok());
    }

    fn resolve_env_vars_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let expand = |value: &str| expand_env_vars(value, &lookup);

        self.conversation.base_url = expand(&self.conversation.base_url);
        self.conversation.model = expand(&self.conversation.model);
        if let Some(ref header) = self.conversation.auth_header {
            self.conversation.auth_header = Some(expand(header));
        }
        for url in &mut self.conversation.fallback_urls {
            *url = expand(url);
        }

        self.resolver.base_url = expand(&self.resolver.base_url);
        self.resolver.version = expand(&self.resolver.version);

        if let Some(ref path) = self.credentials.path {
            self.credentials.path = Some(expand(path));
        }
    }

    /// Get the resolved credential file path
    ///
    /// If path is relative, resolves it relative to ~/.axioschat
    pub fn credentials_path(&self) -> PathBuf {
        let path = PathBuf::from(
            self.credentials
                .path
                .as_deref()
                .unwrap_or(DEFAULT_CREDENTIALS_FILE),
        );

        if path.is_absolute() {
            path
        } else {
            config_home().join(path)
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            generation: self.conversation.generation(),
            resolver: self.resolver.settings(),
            debug: self.session.debug,
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::ChatError::Config(format!("Failed to render config: {}", e)))
    }
}

/// ~/.axioschat, or ./.axioschat when no home directory is known.
pub fn config_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

fn expand_env_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    ENV_VAR_REGEX
        .replace_all(value, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
