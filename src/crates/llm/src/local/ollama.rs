//! Ollama client implementation.
//!
//! Used as the conversational model during local development, in place of
//! the hosted Gaia node. No credential is required.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{ChatMessage, ChatModel, ChatRequest, LocalLlmConfig};
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "llama3.2:latest");
//! let client = OllamaClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
//! let response = client.chat(request).await?;
//! ```

use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, ChatRole};
use crate::traits::{ChatModel, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local LLM inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Convert a chat message to Ollama's message format.
    fn convert_message(&self, msg: &ChatMessage) -> OllamaMessage {
        OllamaMessage {
            role: match msg.role {
                ChatRole::System => "system".to_string(),
                ChatRole::User => "user".to_string(),
                ChatRole::Assistant => "assistant".to_string(),
                // Ollama doesn't have a function role
                ChatRole::Function => "user".to_string(),
            },
            content: msg.content.clone(),
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OllamaRequest {
        let mut options = HashMap::new();
        if let Some(temp) = request.config.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(top_p) = request.config.top_p {
            options.insert("top_p", serde_json::Value::from(top_p));
        }
        if let Some(max_tokens) = request.config.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }
        if !request.config.stop.is_empty() {
            options.insert("stop", serde_json::Value::from(request.config.stop.clone()));
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(|m| self.convert_message(m)).collect(),
            stream: false,
            options: if options.is_empty() { None } else { Some(options) },
        }
    }

    fn convert_response(&self, ollama_resp: OllamaResponse) -> Result<ChatResponse> {
        match ollama_resp.message {
            Some(message) if !message.content.is_empty() => Ok(ChatResponse {
                content: message.content,
                model: ollama_resp.model,
            }),
            _ => Err(LlmError::InvalidResponse(
                "Ollama returned no message content".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let body = self.build_request(&request);
        debug!(url = %url, model = %body.model, "Calling Ollama");

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::ServiceUnavailable(format!(
                    "could not reach Ollama at {}. Make sure it is running with: ollama serve",
                    self.config.base_url
                ))
            } else {
                LlmError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Ollama", status, text));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        self.convert_response(ollama_response)
    }

    fn credential(&self) -> Option<&'static str> {
        None
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    message: Option<OllamaMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OllamaClient {
        OllamaClient::new(LocalLlmConfig::new("http://localhost:11434", "llama3.2:latest")).unwrap()
    }

    #[test]
    fn test_message_conversion_all_roles() {
        let client = client();

        assert_eq!(client.convert_message(&ChatMessage::system("sys")).role, "system");
        assert_eq!(client.convert_message(&ChatMessage::user("hi")).role, "user");
        assert_eq!(client.convert_message(&ChatMessage::assistant("yo")).role, "assistant");

        let func = client.convert_message(&ChatMessage::function("get_token_price", "{\"price\":1}"));
        assert_eq!(func.role, "user");
        assert_eq!(func.content, "{\"price\":1}");
    }

    #[test]
    fn test_build_request_options() {
        let client = client();
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_temperature(0.7)
            .with_top_p(0.9)
            .with_max_tokens(2000);

        let json = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(json["model"], "llama3.2:latest");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 2000);
        assert!(json["options"].get("stop").is_none());
    }

    #[test]
    fn test_build_request_without_options() {
        let client = client();
        let json = serde_json::to_value(client.build_request(&ChatRequest::new(vec![]))).unwrap();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_convert_response() {
        let client = client();
        let parsed: OllamaResponse = serde_json::from_str(
            r#"{"model": "llama3.2:latest", "message": {"role": "assistant", "content": "Hi"}, "done": true}"#,
        )
        .unwrap();
        let response = client.convert_response(parsed).unwrap();
        assert_eq!(response.content, "Hi");
    }

    #[test]
    fn test_convert_response_missing_message() {
        let client = client();
        let parsed: OllamaResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(matches!(
            client.convert_response(parsed),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_no_credential_needed() {
        assert!(client().credential().is_none());
        assert_eq!(client().model_name(), "llama3.2:latest");
    }
}
