//! Intent classification.

use super::prompts::{CLASSIFIER_SYSTEM_PROMPT, FUNCTION_NEEDED_SENTINEL};
use super::{credential_for, GenerationSettings};
use crate::credentials::CredentialStore;
use llm::{ChatMessage, ChatModel, ChatRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shown when the conversational model cannot be reached.
pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting to the AI service. Please try again in a moment.";

/// What the conversational model said, and whether it asked for a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Reply text with the sentinel removed.
    pub text: String,
    pub function_needed: bool,
}

impl Classification {
    /// Split a raw model reply on the sentinel.
    pub fn from_reply(raw: &str) -> Self {
        Self {
            function_needed: raw.contains(FUNCTION_NEEDED_SENTINEL),
            text: raw.replace(FUNCTION_NEEDED_SENTINEL, "").trim().to_string(),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            function_needed: false,
        }
    }
}

/// Decides whether a user turn needs a blockchain function.
pub struct IntentClassifier {
    model: Arc<dyn ChatModel>,
    settings: GenerationSettings,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn ChatModel>, settings: GenerationSettings) -> Self {
        Self { model, settings }
    }

    /// Classify `user_text` against the prior conversation.
    ///
    /// Never fails: a missing credential yields the configuration
    /// instruction, and a model error yields [`CONNECTION_APOLOGY`]. Neither
    /// flags a function.
    pub async fn classify(
        &self,
        history: &[ChatMessage],
        user_text: &str,
        credentials: &dyn CredentialStore,
    ) -> Classification {
        let api_key = match credential_for(self.model.credential(), credentials) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Conversational model credential unavailable");
                return Classification::plain(e.to_string());
            }
        };

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(user_text));

        let mut request = ChatRequest::new(messages)
            .with_temperature(self.settings.temperature)
            .with_top_p(self.settings.top_p);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(key) = api_key {
            request = request.with_api_key(key);
        }

        debug!(model = %self.model.model_name(), history = history.len(), "Classifying intent");

        match self.model.chat(request).await {
            Ok(response) => {
                let classification = Classification::from_reply(&response.content);
                info!(
                    function_needed = classification.function_needed,
                    "Intent classified"
                );
                classification
            }
            Err(e) => {
                warn!(error = %e, "Conversational model call failed");
                Classification::plain(CONNECTION_APOLOGY)
            }
        }
    }
}
