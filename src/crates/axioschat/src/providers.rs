//! Building model clients, the executor and the credential store from
//! configuration.

use crate::config::{AxiosConfig, ConversationConfig, ConversationProvider, ExecutorConfig, ResolverConfig};
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::error::Result;
use crate::executor::{FunctionExecutor, MockChainExecutor};
use crate::session::ChatSession;
use llm::config::{LocalLlmConfig, RemoteLlmConfig};
use llm::local::OllamaClient;
use llm::remote::{OpenAiClient, ReplicateClient};
use llm::{ChatModel, RetryConfig, ToolResolver};
use std::sync::Arc;
use tracing::debug;

/// Create the conversational model client.
pub fn conversation_model(config: &ConversationConfig) -> Result<Arc<dyn ChatModel>> {
    debug!(provider = %config.provider, base_url = %config.base_url, model = %config.model, "Creating conversational model");

    match config.provider {
        ConversationProvider::Gaia => {
            let mut remote = RemoteLlmConfig::new(config.base_url.clone(), config.model.clone())
                .with_timeout(config.timeout());
            if let Some(header) = &config.auth_header {
                remote = remote.with_auth_header(header.clone());
            }
            for url in &config.fallback_urls {
                remote = remote.with_fallback_url(url.clone());
            }
            Ok(Arc::new(OpenAiClient::new(remote)?))
        }
        ConversationProvider::Ollama => {
            let local = LocalLlmConfig::new(config.base_url.clone(), config.model.clone())
                .with_timeout(config.timeout());
            Ok(Arc::new(OllamaClient::new(local)?))
        }
    }
}

/// Create the tool-resolution model client.
pub fn tool_resolver(config: &ResolverConfig) -> Result<Arc<dyn ToolResolver>> {
    debug!(base_url = %config.base_url, version = %config.version, "Creating tool resolver");

    let remote = RemoteLlmConfig::new(config.base_url.clone(), config.version.clone())
        .with_timeout(config.timeout());
    let retry = RetryConfig {
        max_retries: config.max_retries,
        ..RetryConfig::default()
    };
    Ok(Arc::new(ReplicateClient::new(remote)?.with_retry(retry)))
}

pub fn executor(config: &ExecutorConfig) -> Arc<dyn FunctionExecutor> {
    Arc::new(MockChainExecutor::new(config.latency()))
}

/// Open the file-backed credential store at the configured path.
pub fn credential_store(config: &AxiosConfig) -> Result<Arc<dyn CredentialStore>> {
    Ok(Arc::new(FileCredentialStore::open(config.credentials_path())?))
}

/// Wire a complete session from configuration.
pub fn session(config: &AxiosConfig, credentials: Arc<dyn CredentialStore>) -> Result<ChatSession> {
    Ok(ChatSession::new(
        conversation_model(&config.conversation)?,
        tool_resolver(&config.resolver)?,
        executor(&config.executor),
        credentials,
        config.session_options(),
    ))
}
