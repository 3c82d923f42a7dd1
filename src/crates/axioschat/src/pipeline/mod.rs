//! The per-turn pipeline stages.
//!
//! Classifier → Resolver → gate → executor → Interpreter. Each stage owns its
//! model handle and looks up its credential from the store it is given, so a
//! missing key is caught before any network I/O.

mod classifier;
mod interpreter;
pub mod prompts;
mod resolver;

pub use classifier::{Classification, IntentClassifier, CONNECTION_APOLOGY};
pub use interpreter::{fallback_response, Interpreter};
pub use resolver::FunctionResolver;

use crate::credentials::{CredentialError, CredentialKind, CredentialStore};
use serde::{Deserialize, Serialize};

/// Sampling parameters for the conversational model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: Some(2000),
        }
    }
}

/// Sampling parameters for the tool-resolution model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_new_tokens: u32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_new_tokens: 2000,
        }
    }
}

/// Look up the credential a model declares, if any.
///
/// Providers unknown to the store are treated as needing no credential.
pub(crate) fn credential_for(
    provider: Option<&'static str>,
    store: &dyn CredentialStore,
) -> Result<Option<String>, CredentialError> {
    let Some(kind) = provider.and_then(|p| p.parse::<CredentialKind>().ok()) else {
        return Ok(None);
    };
    store.require(kind).map(Some)
}
