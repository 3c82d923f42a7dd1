//! OpenAI-compatible chat-completion client.
//!
//! Speaks the `/chat/completions` wire format used by OpenAI and by the Gaia
//! Network node that hosts Qwen (`https://qwen72b.gaia.domains/v1`). The same
//! client works through a same-origin proxy by pointing `base_url` at it and
//! setting `auth_header` to the header the proxy expects.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatMessage, ChatModel, ChatRequest, RemoteLlmConfig};
//!
//! let config = RemoteLlmConfig::new("https://qwen72b.gaia.domains/v1", "qwen72b");
//! let client = OpenAiClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![ChatMessage::user("What is a rollup?")])
//!     .with_api_key("gaia-...");
//! let response = client.chat(request).await?;
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, ChatRole};
use crate::traits::{ChatModel, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Credential name used for OpenAI-compatible endpoints.
pub const GAIA_CREDENTIAL: &str = "gaia";

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Convert a chat message to the OpenAI wire format.
    fn convert_message(&self, msg: &ChatMessage) -> OpenAiMessage {
        let name = match msg.role {
            // Function messages must carry a name
            ChatRole::Function => Some(msg.name.clone().unwrap_or_else(|| "function".to_string())),
            _ => None,
        };

        OpenAiMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content.clone()),
            name,
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(|m| self.convert_message(m)).collect(),
            temperature: request.config.temperature,
            top_p: request.config.top_p,
            max_tokens: request.config.max_tokens,
            stop: if request.config.stop.is_empty() {
                None
            } else {
                Some(request.config.stop.clone())
            },
        }
    }

    /// Extract the reply text from a completion response.
    fn convert_response(&self, openai_resp: OpenAiResponse) -> Result<ChatResponse> {
        let choice = openai_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: openai_resp.model,
        })
    }

    async fn post_to(&self, base_url: &str, api_key: &str, body: &OpenAiRequest) -> Result<ChatResponse> {
        let url = completions_url(base_url);
        debug!(url = %url, model = %body.model, messages = body.messages.len(), "Calling chat completion endpoint");

        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        let builder = match &self.config.auth_header {
            Some(header) => builder.header(header.as_str(), api_key),
            None => builder.bearer_auth(api_key),
        };

        let response = builder.json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("chat completion endpoint", status, text));
        }

        let openai_response: OpenAiResponse = response.json().await?;
        self.convert_response(openai_response)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = request
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::ApiKeyNotFound(GAIA_CREDENTIAL.to_string()))?;

        let body = self.build_request(&request);

        let mut last_error = None;
        for base_url in self.config.endpoints() {
            match self.post_to(base_url, &api_key, &body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_auth_error() => return Err(e),
                Err(e) => {
                    warn!(url = %base_url, error = %e, "Chat completion endpoint failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::ConfigError("no chat completion endpoint configured".to_string())))
    }

    fn credential(&self) -> Option<&'static str> {
        Some(GAIA_CREDENTIAL)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Accept either an API base (`.../v1`) or a full completions URL.
fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}
