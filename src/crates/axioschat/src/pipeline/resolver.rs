//! Function resolution against the tool-specialised model.

use super::{credential_for, ResolverSettings};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::functions::{default_tools_json, enrich_arguments, parse_resolver_output, FunctionCall, ResolverOutcome};
use llm::{ResolveRequest, ToolResolver};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns a user utterance into at most one function call.
pub struct FunctionResolver {
    resolver: Arc<dyn ToolResolver>,
    tools: String,
    settings: ResolverSettings,
}

impl FunctionResolver {
    /// Resolver over the default Web3 tool catalog.
    pub fn new(resolver: Arc<dyn ToolResolver>, settings: ResolverSettings) -> Self {
        Self::with_tools(resolver, default_tools_json(), settings)
    }

    /// Resolver over a custom tool list, serialized as a JSON string.
    pub fn with_tools(
        resolver: Arc<dyn ToolResolver>,
        tools: impl Into<String>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            resolver,
            tools: tools.into(),
            settings,
        }
    }

    /// Resolve the latest utterance.
    ///
    /// `Ok(None)` means the model answered but named no usable function.
    /// Errors are a missing credential or a failed model call.
    pub async fn resolve(
        &self,
        utterance: &str,
        credentials: &dyn CredentialStore,
    ) -> Result<Option<FunctionCall>> {
        let api_key = credential_for(self.resolver.credential(), credentials)?;

        let mut request = ResolveRequest::new(utterance, self.tools.as_str());
        request.temperature = self.settings.temperature;
        request.top_p = self.settings.top_p;
        request.max_new_tokens = self.settings.max_new_tokens;
        if let Some(key) = api_key {
            request = request.with_api_key(key);
        }

        debug!(query = %utterance, "Resolving function");
        let output = self.resolver.resolve(request).await?;

        let mut calls = match parse_resolver_output(&output) {
            ResolverOutcome::Calls(calls) => calls,
            ResolverOutcome::Text(text) => {
                info!(reply = %text, "Resolver answered in prose");
                return Ok(None);
            }
            ResolverOutcome::Unrecognized => {
                info!("Resolver output named no function");
                return Ok(None);
            }
        };

        if calls.len() > 1 {
            let ignored: Vec<&str> = calls[1..].iter().map(|c| c.name.as_str()).collect();
            warn!(ignored = ?ignored, "Resolver returned several calls, using the first");
        }
        let mut call = calls.swap_remove(0);
        enrich_arguments(&mut call, utterance);

        info!(function = %call.name, id = %call.id, "Function resolved");
        Ok(Some(call))
    }
}
