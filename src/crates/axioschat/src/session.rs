//! Chat session orchestration.
//!
//! A [`ChatSession`] owns the conversation and the function-call queue and
//! drives each user turn through the pipeline. Stage failures never escape as
//! errors: they are written into the conversation as assistant text. The
//! only errors returned are caller mistakes, such as approving an unknown or
//! already-settled call.
//!
//! All operations take `&mut self`, so a session processes one turn at a time.

use crate::credentials::CredentialStore;
use crate::error::{ChatError, Result};
use crate::executor::FunctionExecutor;
use crate::functions::{is_read_only, FunctionCall, FunctionStatus};
use crate::pipeline::{
    FunctionResolver, GenerationSettings, IntentClassifier, Interpreter, ResolverSettings,
};
use llm::{ChatMessage, ChatModel, ChatRole, ToolResolver};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Placeholder while a read-only call is resolved and executed.
pub const CHECKING_PLACEHOLDER: &str = "I'm checking that information for you...";
/// Placeholder while an approved call executes.
pub const PROCESSING_PLACEHOLDER: &str = "I'm processing your request...";
/// Shown when the resolver names no usable function.
pub const UNRESOLVED_MESSAGE: &str =
    "I couldn't determine the specific function needed. Could you please provide more details?";
/// Recorded on calls the user turns down.
pub const REJECTED_BY_USER: &str = "Rejected by user";

/// A conversation message with a session-unique id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub id: String,
    #[serde(flatten)]
    pub message: ChatMessage,
}

impl SessionMessage {
    fn new(message: ChatMessage) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message,
        }
    }

    pub fn role(&self) -> ChatRole {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}

/// What happened to the function side of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallDisposition {
    /// The model answered conversationally.
    None,
    /// A read-only call ran without approval.
    AutoExecuted { call_id: String },
    /// A mutating call is queued for the user.
    AwaitingApproval { call_id: String },
    /// A function was needed but none could be identified.
    Unresolved,
    /// Resolution or execution failed; the text is already in the conversation.
    Failed { error: String },
}

/// Result of submitting one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The conversational reply, sentinel removed.
    pub reply: String,
    /// Final text of the placeholder message, when a function was needed.
    pub follow_up: Option<String>,
    pub disposition: CallDisposition,
}

/// Tunables for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    pub generation: GenerationSettings,
    pub resolver: ResolverSettings,
    /// Show `function` messages in [`ChatSession::visible_messages`].
    pub debug: bool,
}

/// A single user's conversation with the assistant.
pub struct ChatSession {
    classifier: IntentClassifier,
    resolver: FunctionResolver,
    interpreter: Interpreter,
    executor: Arc<dyn FunctionExecutor>,
    credentials: Arc<dyn CredentialStore>,
    messages: Vec<SessionMessage>,
    function_calls: Vec<FunctionCall>,
    debug: bool,
}

impl ChatSession {
    pub fn new(
        conversation: Arc<dyn ChatModel>,
        resolver: Arc<dyn ToolResolver>,
        executor: Arc<dyn FunctionExecutor>,
        credentials: Arc<dyn CredentialStore>,
        options: SessionOptions,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(conversation.clone(), options.generation),
            resolver: FunctionResolver::new(resolver, options.resolver),
            interpreter: Interpreter::new(conversation, options.generation),
            executor,
            credentials,
            messages: Vec::new(),
            function_calls: Vec::new(),
            debug: options.debug,
        }
    }

    /// Run one user turn through the pipeline.
    ///
    /// Returns `Ok(None)` for blank input, which is ignored.
    pub async fn submit(&mut self, text: &str) -> Result<Option<TurnOutcome>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let history: Vec<ChatMessage> = self.messages.iter().map(|m| m.message.clone()).collect();
        self.push(ChatMessage::user(text));

        let classification = self
            .classifier
            .classify(&history, text, self.credentials.as_ref())
            .await;
        self.push(ChatMessage::assistant(classification.text.clone()));

        if !classification.function_needed {
            return Ok(Some(TurnOutcome {
                reply: classification.text,
                follow_up: None,
                disposition: CallDisposition::None,
            }));
        }

        let placeholder = self.push(ChatMessage::assistant(CHECKING_PLACEHOLDER));

        let disposition = match self.resolver.resolve(text, self.credentials.as_ref()).await {
            Err(e) => {
                let message = match &e {
                    ChatError::Credential(c) => c.to_string(),
                    other => format!("I encountered an error while processing your request: {}", other),
                };
                self.replace(&placeholder, message);
                CallDisposition::Failed { error: e.to_string() }
            }
            Ok(None) => {
                self.replace(&placeholder, UNRESOLVED_MESSAGE);
                CallDisposition::Unresolved
            }
            Ok(Some(call)) => {
                let call_id = call.id.clone();
                let read_only = is_read_only(&call.name);
                info!(function = %call.name, id = %call_id, read_only, "Function gated");
                let name = call.name.clone();
                self.function_calls.push(call);

                if read_only {
                    self.run_call(
                        &call_id,
                        Some(text),
                        &placeholder,
                        "I encountered an error while checking that information",
                    )
                    .await?
                } else {
                    self.replace(
                        &placeholder,
                        format!(
                            "I need your approval to execute the {} function. Please check the transaction queue.",
                            name
                        ),
                    );
                    CallDisposition::AwaitingApproval { call_id }
                }
            }
        };

        Ok(Some(TurnOutcome {
            reply: classification.text,
            follow_up: self.message_text(&placeholder),
            disposition,
        }))
    }

    /// Approve and execute a pending call. Returns the assistant's reply.
    pub async fn approve(&mut self, id: &str) -> Result<String> {
        self.call_mut(id)?.approve()?;
        info!(id = %id, "Function approved");

        let placeholder = self.push(ChatMessage::assistant(PROCESSING_PLACEHOLDER));
        self.run_call(
            id,
            None,
            &placeholder,
            "I encountered an error while processing your request",
        )
        .await?;

        Ok(self.message_text(&placeholder).unwrap_or_default())
    }

    /// Decline a pending or approved call.
    pub fn reject(&mut self, id: &str) -> Result<()> {
        self.call_mut(id)?.reject(REJECTED_BY_USER)?;
        info!(id = %id, "Function rejected by user");
        Ok(())
    }

    /// Forget the conversation and every function call.
    pub fn new_conversation(&mut self) {
        debug!(
            messages = self.messages.len(),
            calls = self.function_calls.len(),
            "Starting new conversation"
        );
        self.messages.clear();
        self.function_calls.clear();
    }

    /// Messages to show the user; `function` messages only in debug mode.
    pub fn visible_messages(&self) -> Vec<&SessionMessage> {
        self.messages
            .iter()
            .filter(|m| self.debug || m.role() != ChatRole::Function)
            .collect()
    }

    /// Calls awaiting the user's decision.
    pub fn pending_calls(&self) -> Vec<&FunctionCall> {
        self.function_calls
            .iter()
            .filter(|c| c.status == FunctionStatus::Pending)
            .collect()
    }

    pub fn messages(&self) -> &[SessionMessage] {
        &self.messages
    }

    pub fn function_calls(&self) -> &[FunctionCall] {
        &self.function_calls
    }

    pub fn function_call(&self, id: &str) -> Option<&FunctionCall> {
        self.function_calls.iter().find(|c| c.id == id)
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Execute a call already in the queue and settle it.
    async fn run_call(
        &mut self,
        id: &str,
        question: Option<&str>,
        placeholder: &str,
        error_prefix: &str,
    ) -> Result<CallDisposition> {
        let call = self
            .function_call(id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(format!("function call {}", id)))?;

        match self.executor.execute(&call).await {
            Ok(result) => {
                self.call_mut(id)?.mark_executed(result.clone())?;
                let reply = self
                    .interpreter
                    .interpret(question, &call, &result, self.credentials.as_ref())
                    .await;
                self.replace(placeholder, reply);
                self.push(function_message(&call, &result)?);
                Ok(CallDisposition::AutoExecuted {
                    call_id: call.id,
                })
            }
            Err(e) => {
                error!(function = %call.name, id = %call.id, error = %e, "Function execution failed");
                self.replace(placeholder, format!("{}: {}", error_prefix, e));
                self.call_mut(id)?.reject(e.to_string())?;
                Ok(CallDisposition::Failed {
                    error: e.to_string(),
                })
            }
        }
    }

    fn push(&mut self, message: ChatMessage) -> String {
        let message = SessionMessage::new(message);
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    fn replace(&mut self, id: &str, content: impl Into<String>) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.message.content = content.into();
        }
    }

    fn message_text(&self, id: &str) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.message.content.clone())
    }

    fn call_mut(&mut self, id: &str) -> Result<&mut FunctionCall> {
        self.function_calls
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ChatError::NotFound(format!("function call {}", id)))
    }
}

/// The debug record appended after every execution.
fn function_message(call: &FunctionCall, result: &Value) -> Result<ChatMessage> {
    let content = serde_json::to_string_pretty(&json!({
        "function_name": call.name,
        "arguments": call.arguments,
        "result": result,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))?;
    Ok(ChatMessage::function(&call.name, content))
}
