//! Credential storage
//!
//! Credentials are keyed by provider and consumed through the synchronous
//! [`CredentialStore`] capability. The session holds the store explicitly and
//! hands it to each stage; nothing reads keys from ambient state.
//!
//! Two stores are provided:
//! - [`FileCredentialStore`]: JSON file loaded once at startup and rewritten
//!   on every `set`. Environment variables fill in keys the file lacks.
//! - [`MemoryCredentialStore`]: in-process only, for tests and one-shot runs.

use crate::error::{ChatError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Required prefix for Gaia Network API keys.
pub const GAIA_KEY_PREFIX: &str = "gaia-";

/// Providers that need a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKind {
    /// Gaia Network key for the conversational model.
    Gaia,
    /// Replicate token for the tool-resolution model.
    Replicate,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::Gaia => "gaia",
            CredentialKind::Replicate => "replicate",
        }
    }

    pub fn all() -> [CredentialKind; 2] {
        [CredentialKind::Gaia, CredentialKind::Replicate]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CredentialKind::Gaia => "Gaia Network API key",
            CredentialKind::Replicate => "Replicate API token",
        }
    }

    /// Environment variable consulted when the store has no value.
    pub fn env_var(&self) -> &'static str {
        match self {
            CredentialKind::Gaia => "AXIOSCHAT_GAIA_API_KEY",
            CredentialKind::Replicate => "AXIOSCHAT_REPLICATE_API_TOKEN",
        }
    }

    /// Check the credential's format without contacting the provider.
    pub fn validate(&self, value: &str) -> std::result::Result<(), CredentialError> {
        match self {
            CredentialKind::Gaia if !value.starts_with(GAIA_KEY_PREFIX) => {
                Err(CredentialError::Malformed {
                    kind: *self,
                    reason: format!("Gaia Network API keys must start with '{}'", GAIA_KEY_PREFIX),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            // The web client stored the Gaia key under its old provider names
            "gaia" | "gemini" | "openai" | "qwen" => Ok(CredentialKind::Gaia),
            "replicate" | "flock" => Ok(CredentialKind::Replicate),
            other => Err(ChatError::Config(format!(
                "Unknown credential provider: {}. Available: gaia, replicate",
                other
            ))),
        }
    }
}

/// Why a stage could not obtain a usable credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please provide a {} in the settings to use the chatbot.", .0.display_name())]
    Missing(CredentialKind),

    #[error("Your {} is not valid: {reason}. Please update it in the settings.", .kind.display_name())]
    Malformed { kind: CredentialKind, reason: String },
}

/// Synchronous key-value capability keyed by provider.
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: CredentialKind) -> Option<String>;

    fn set(&self, kind: CredentialKind, value: &str) -> Result<()>;

    /// Fetch a credential and check its format.
    fn require(&self, kind: CredentialKind) -> std::result::Result<String, CredentialError> {
        let value = self
            .get(kind)
            .filter(|v| !v.trim().is_empty())
            .ok_or(CredentialError::Missing(kind))?;
        kind.validate(&value)?;
        Ok(value)
    }
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<BTreeMap<CredentialKind, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, kind: CredentialKind, value: impl Into<String>) -> Self {
        self.keys.write().insert(kind, value.into());
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.keys.read().get(&kind).cloned()
    }

    fn set(&self, kind: CredentialKind, value: &str) -> Result<()> {
        self.keys.write().insert(kind, value.to_string());
        Ok(())
    }
}

/// JSON-file-backed credential store.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    keys: RwLock<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Load the store from `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let keys = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            debug!(path = %path.display(), "Credential file not found, starting empty");
            BTreeMap::new()
        };

        let store = Self {
            path,
            keys: RwLock::new(keys),
        };

        for kind in CredentialKind::all() {
            if let Some(value) = store.get(kind) {
                if let Err(e) = kind.validate(&value) {
                    warn!(provider = %kind, error = %e, "Stored credential has an unexpected format");
                }
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, keys: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(keys)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.keys
            .read()
            .get(kind.as_str())
            .filter(|v| !v.is_empty())
            .cloned()
            .or_else(|| std::env::var(kind.env_var()).ok().filter(|v| !v.is_empty()))
    }

    fn set(&self, kind: CredentialKind, value: &str) -> Result<()> {
        if let Err(e) = kind.validate(value) {
            warn!(provider = %kind, error = %e, "Saving credential with an unexpected format");
        }

        let mut keys = self.keys.write();
        keys.insert(kind.as_str().to_string(), value.to_string());
        self.persist(&keys)?;
        info!(provider = %kind, path = %self.path.display(), "Credential saved");
        Ok(())
    }
}

/// Mask a secret for display, keeping a short recognisable prefix.
pub fn mask(value: &str) -> String {
    let visible: String = value.chars().take(5).collect();
    if value.chars().count() <= 8 {
        "*".repeat(value.chars().count())
    } else {
        format!("{}…{}", visible, "*".repeat(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("gaia".parse::<CredentialKind>().unwrap(), CredentialKind::Gaia);
        assert_eq!("OpenAI".parse::<CredentialKind>().unwrap(), CredentialKind::Gaia);
        assert_eq!("replicate".parse::<CredentialKind>().unwrap(), CredentialKind::Replicate);
        assert!("anthropic".parse::<CredentialKind>().is_err());
    }

    #[test]
    fn test_gaia_prefix_validation() {
        assert!(CredentialKind::Gaia.validate("gaia-123").is_ok());
        assert!(matches!(
            CredentialKind::Gaia.validate("sk-123"),
            Err(CredentialError::Malformed { kind: CredentialKind::Gaia, .. })
        ));
        assert!(CredentialKind::Replicate.validate("r8_anything").is_ok());
    }

    #[test]
    fn test_require_missing_and_malformed() {
        let store = MemoryCredentialStore::new();
        assert_eq!(
            store.require(CredentialKind::Replicate),
            Err(CredentialError::Missing(CredentialKind::Replicate))
        );

        store.set(CredentialKind::Gaia, "not-a-gaia-key").unwrap();
        assert!(matches!(
            store.require(CredentialKind::Gaia),
            Err(CredentialError::Malformed { .. })
        ));

        store.set(CredentialKind::Gaia, "gaia-ok").unwrap();
        assert_eq!(store.require(CredentialKind::Gaia).unwrap(), "gaia-ok");
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let store = MemoryCredentialStore::new().with(CredentialKind::Replicate, "   ");
        assert_eq!(
            store.require(CredentialKind::Replicate),
            Err(CredentialError::Missing(CredentialKind::Replicate))
        );
    }

    #[test]
    fn test_missing_message_wording() {
        let msg = CredentialError::Missing(CredentialKind::Gaia).to_string();
        assert_eq!(
            msg,
            "Please provide a Gaia Network API key in the settings to use the chatbot."
        );
    }

    #[test]
    fn test_file_store_persists_on_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        assert!(!path.exists());

        store.set(CredentialKind::Replicate, "r8_token").unwrap();
        assert!(path.exists());

        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.get(CredentialKind::Replicate).as_deref(), Some("r8_token"));

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("replicate").map(String::as_str), Some("r8_token"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileCredentialStore::open(&path), Err(ChatError::Serde(_))));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("gaia-abcdef123456"), "gaia-…****");
        assert_eq!(mask("short"), "*****");
    }
}
