//! Model provider clients for AxiosChat.
//!
//! Two kinds of model are involved in a turn:
//!
//! - A **conversational** model ([`ChatModel`]) that chats with the user,
//!   flags when a blockchain function is needed, and later explains the
//!   function's result. Served by Gaia Network over the OpenAI wire format,
//!   or by a local Ollama during development.
//! - A **tool-resolution** model ([`ToolResolver`]) that maps a single query
//!   onto a function name and arguments given a list of tool schemas. Served
//!   by the Flock Web3 model on Replicate.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatMessage, ChatModel, ChatRequest, RemoteLlmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::new("https://qwen72b.gaia.domains/v1", "qwen72b");
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![ChatMessage::user("What is DeFi?")])
//!         .with_temperature(0.7)
//!         .with_api_key(std::env::var("AXIOSCHAT_GAIA_API_KEY")?);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod retry;
pub mod traits;

#[cfg(test)]
mod testing;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
pub use message::{ChatMessage, ChatRole};
pub use retry::RetryConfig;
pub use traits::{ChatConfig, ChatModel, ChatRequest, ChatResponse, ResolveRequest, ToolResolver};
