//! Replicate prediction client for the Flock Web3 tool-calling model.
//!
//! A prediction is created synchronously (`Prefer: wait`) with
//! `{version, input: {query, tools, temperature, top_p, max_new_tokens}}` and
//! the model's `output` is handed back untouched. Cold models tend to finish
//! with a `null` output; those are retried with exponential backoff.

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::retry::{with_retry, RetryConfig};
use crate::traits::{ResolveRequest, ToolResolver};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Credential name used for Replicate.
pub const REPLICATE_CREDENTIAL: &str = "replicate";

/// Model version of the Flock Web3 agent on Replicate.
pub const FLOCK_WEB3_VERSION: &str = "3babfa32ab245cf8e047ff7366bcb4d5a2b4f0f108f504c47d5a84e23c02ff5f";

/// Replicate predictions client.
#[derive(Clone)]
pub struct ReplicateClient {
    config: RemoteLlmConfig,
    retry: RetryConfig,
    client: Client,
}

impl ReplicateClient {
    /// Create a client; `config.model` holds the model version hash.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            retry: RetryConfig::default(),
            client,
        })
    }

    /// Override the cold-start retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, request: &ResolveRequest) -> PredictionRequest<'_> {
        PredictionRequest {
            version: &self.config.model,
            input: PredictionInput {
                query: request.query.clone(),
                tools: request.tools.clone(),
                top_p: request.top_p,
                temperature: request.temperature,
                max_new_tokens: request.max_new_tokens,
            },
        }
    }

    async fn create_prediction(&self, api_key: &str, body: &PredictionRequest<'_>) -> Result<Value> {
        let url = format!("{}/predictions", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, version = %body.version, "Creating prediction");

        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Prefer", "wait");
        let builder = match &self.config.auth_header {
            Some(header) => builder.header(header.as_str(), api_key),
            None => builder.bearer_auth(api_key),
        };

        let response = builder.json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Replicate", status, error_detail(&text)));
        }

        let prediction: PredictionResponse = response.json().await?;
        extract_output(prediction)
    }
}

#[async_trait]
impl ToolResolver for ReplicateClient {
    async fn resolve(&self, request: ResolveRequest) -> Result<Value> {
        let api_key = request
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::ApiKeyNotFound(REPLICATE_CREDENTIAL.to_string()))?;

        let body = self.build_request(&request);

        with_retry(
            &self.retry,
            "replicate-prediction",
            |e: &LlmError| e.is_retryable(),
            || self.create_prediction(&api_key, &body),
        )
        .await
    }

    fn credential(&self) -> Option<&'static str> {
        Some(REPLICATE_CREDENTIAL)
    }
}

/// Pull `output` out of a finished prediction.
///
/// A `null` output on a successful prediction is reported as
/// `ServiceUnavailable` so the retry loop treats it as a cold start.
fn extract_output(prediction: PredictionResponse) -> Result<Value> {
    if let Some(error) = prediction.error.filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(LlmError::ProviderError(message));
    }

    match prediction.output {
        Some(Value::Null) | None => Err(LlmError::ServiceUnavailable(format!(
            "prediction {} returned no output (status: {})",
            prediction.id.as_deref().unwrap_or("?"),
            prediction.status.as_deref().unwrap_or("unknown")
        ))),
        Some(output) => Ok(output),
    }
}

/// Prefer Replicate's `detail`/`error` field over the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(|d| d.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    query: String,
    tools: String,
    top_p: f32,
    temperature: f32,
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}
