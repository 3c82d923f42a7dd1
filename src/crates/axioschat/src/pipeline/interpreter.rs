//! Result interpretation, with deterministic fallback text.

use super::prompts::{interpretation_system_prompt, interpretation_user_prompt};
use super::{credential_for, GenerationSettings};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::functions::{FunctionCall, Web3Function};
use llm::{ChatMessage, ChatModel, ChatRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Explains function results in natural language.
pub struct Interpreter {
    model: Arc<dyn ChatModel>,
    settings: GenerationSettings,
}

impl Interpreter {
    pub fn new(model: Arc<dyn ChatModel>, settings: GenerationSettings) -> Self {
        Self { model, settings }
    }

    /// Explain `result` for the user. Falls back to [`fallback_response`]
    /// when the model is unavailable, fails, or says nothing.
    pub async fn interpret(
        &self,
        question: Option<&str>,
        call: &FunctionCall,
        result: &Value,
        credentials: &dyn CredentialStore,
    ) -> String {
        match self.explain(question, call, result, credentials).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                info!(function = %call.name, "Empty interpretation, using fallback");
                fallback_response(call, result)
            }
            Err(e) => {
                warn!(function = %call.name, error = %e, "Interpretation failed, using fallback");
                fallback_response(call, result)
            }
        }
    }

    async fn explain(
        &self,
        question: Option<&str>,
        call: &FunctionCall,
        result: &Value,
        credentials: &dyn CredentialStore,
    ) -> Result<String> {
        let api_key = credential_for(self.model.credential(), credentials)?;

        let messages = vec![
            ChatMessage::system(interpretation_system_prompt(&call.name, &call.arguments, result)),
            ChatMessage::user(interpretation_user_prompt(question)),
        ];
        let mut request = ChatRequest::new(messages)
            .with_temperature(self.settings.temperature)
            .with_top_p(self.settings.top_p);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(key) = api_key {
            request = request.with_api_key(key);
        }

        debug!(function = %call.name, "Requesting interpretation");
        let response = self.model.chat(request).await?;
        Ok(response.content)
    }
}

/// Render a JSON value for inline text: strings unquoted, absent as "unknown".
fn inline(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "unknown".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Templated explanation of a function result. Never fails.
pub fn fallback_response(call: &FunctionCall, result: &Value) -> String {
    let arg = |key: &str| inline(call.arguments.get(key));
    let field = |key: &str| inline(result.get(key));
    let is_native = call.arguments.get("token_address").and_then(Value::as_str) == Some("native");

    match Web3Function::from_name(&call.name) {
        Some(Web3Function::GetTokenBalance) => {
            let token = result
                .get("token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty());
            let unit = if is_native { "BNB" } else { token.unwrap_or("tokens") };
            format!(
                "Your {} balance is {} {}.",
                token.unwrap_or("token"),
                field("balance"),
                unit
            )
        }
        Some(Web3Function::GetTokenPrice) => format!(
            "The current price of {} is {} USD.",
            arg("token_symbol"),
            field("price")
        ),
        Some(Web3Function::SendToken) => format!(
            "Transaction sent! {} {} have been sent to {}. Transaction hash: {}",
            arg("amount"),
            if is_native { "BNB" } else { "tokens" },
            arg("to_address"),
            field("txHash")
        ),
        Some(Web3Function::SwapTokens) => format!(
            "Swap completed! You received {} {}. Transaction hash: {}",
            field("amountOut"),
            arg("token_out"),
            field("txHash")
        ),
        Some(Web3Function::GetGasPrice) => format!(
            "The current gas price is {} {}.",
            field("price"),
            field("unit")
        ),
        _ => format!(
            "Function {} executed successfully: {}",
            call.name,
            serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
        ),
    }
}
