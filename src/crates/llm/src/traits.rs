//! Provider-agnostic traits for the two kinds of model the assistant uses.
//!
//! - [`ChatModel`]: a conversational model taking a message history and
//!   returning text (Gaia Network, Ollama).
//! - [`ToolResolver`]: a tool-specialised model taking a single query plus a
//!   serialized tool list and returning an untyped `output` value whose shape
//!   varies between deployments (Replicate-hosted Flock Web3).
//!
//! Credentials travel with each request instead of living in the client, so
//! callers decide per call whether a key is present and can skip network I/O
//! entirely when it is not.

use crate::error::Result;
use crate::message::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling settings for a chat completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stop: Vec<String>,
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub config: ChatConfig,
    /// Credential for providers that need one.
    pub api_key: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
            api_key: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// A completed chat response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    /// Model that actually served the request, when the provider reports it.
    pub model: Option<String>,
}

impl ChatResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }
}

/// A conversational model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete reply for the request.
    ///
    /// Returns `LlmError::ApiKeyNotFound` without touching the network when
    /// the provider needs a credential and the request carries none.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Name of the credential this model needs, or `None` for local models.
    fn credential(&self) -> Option<&'static str>;

    /// The model identifier in use.
    fn model_name(&self) -> &str;
}

/// Input for a tool-resolution model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
    /// JSON-encoded list of tool schemas.
    pub tools: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_new_tokens: u32,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl ResolveRequest {
    pub fn new(query: impl Into<String>, tools: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tools: tools.into(),
            temperature: 0.7,
            top_p: 0.9,
            max_new_tokens: 3000,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// A model that maps a query onto one or more tool invocations.
#[async_trait]
pub trait ToolResolver: Send + Sync {
    /// Return the raw `output` value produced by the model.
    ///
    /// The value is deliberately untyped: it may be a string, a JSON-encoded
    /// string, an array of either, or OpenAI-style tool call objects.
    async fn resolve(&self, request: ResolveRequest) -> Result<Value>;

    /// Name of the credential this resolver needs.
    fn credential(&self) -> Option<&'static str>;
}
