//! Common test utilities: scripted models and session builders

#![allow(dead_code)]

use async_trait::async_trait;
use axioschat::credentials::{CredentialKind, CredentialStore, MemoryCredentialStore};
use axioschat::executor::{FunctionExecutor, MockChainExecutor};
use axioschat::{ChatError, ChatSession, FunctionCall, SessionOptions};
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError, ResolveRequest, ToolResolver};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Conversational model that replays queued replies in order.
///
/// An exhausted script answers with a service error, which the pipeline
/// treats like any other unreachable endpoint.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    credential: Option<&'static str>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = &'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
            credential: Some("gaia"),
        })
    }

    /// A model that needs no credential, like a local one.
    pub fn local(replies: impl IntoIterator<Item = &'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
            credential: None,
        })
    }

    pub fn push_error(&self, message: &str) {
        self.replies.lock().push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        self.requests.lock().push(request);
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(ChatResponse::new(reply)),
            Some(Err(message)) => Err(LlmError::ServiceUnavailable(message)),
            None => Err(LlmError::ServiceUnavailable("script exhausted".to_string())),
        }
    }

    fn credential(&self) -> Option<&'static str> {
        self.credential
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Tool resolver that replays queued raw outputs.
pub struct ScriptedResolver {
    outputs: Mutex<VecDeque<Result<Value, String>>>,
    requests: Mutex<Vec<ResolveRequest>>,
}

impl ScriptedResolver {
    pub fn new(outputs: impl IntoIterator<Item = Value>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let resolver = Self::new([]);
        resolver.outputs.lock().push_back(Err(message.to_string()));
        resolver
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<ResolveRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ToolResolver for ScriptedResolver {
    async fn resolve(&self, request: ResolveRequest) -> llm::Result<Value> {
        self.requests.lock().push(request);
        match self.outputs.lock().pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(LlmError::ProviderError(message)),
            None => Err(LlmError::ProviderError("script exhausted".to_string())),
        }
    }

    fn credential(&self) -> Option<&'static str> {
        Some("replicate")
    }
}

/// Executor whose chain is always unreachable.
pub struct FailingExecutor;

#[async_trait]
impl FunctionExecutor for FailingExecutor {
    async fn execute(&self, _call: &FunctionCall) -> axioschat::Result<Value> {
        Err(ChatError::Execution("chain unreachable".to_string()))
    }
}

/// A store holding well-formed keys for both providers.
pub fn full_credentials() -> Arc<MemoryCredentialStore> {
    Arc::new(
        MemoryCredentialStore::new()
            .with(CredentialKind::Gaia, "gaia-test-key")
            .with(CredentialKind::Replicate, "r8_test_token"),
    )
}

/// Build a session over the mock chain with no simulated latency.
pub fn session(model: Arc<ScriptedModel>, resolver: Arc<ScriptedResolver>) -> ChatSession {
    session_with(
        model,
        resolver,
        Arc::new(MockChainExecutor::instant()),
        full_credentials(),
    )
}

pub fn session_with(
    model: Arc<ScriptedModel>,
    resolver: Arc<ScriptedResolver>,
    executor: Arc<dyn FunctionExecutor>,
    credentials: Arc<dyn CredentialStore>,
) -> ChatSession {
    ChatSession::new(model, resolver, executor, credentials, SessionOptions::default())
}
