//! Configuration loader with dual-location support
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.axioschat/axioschat.toml
//! 3. Project-level config: ./.axioschat/axioschat.toml
//!
//! Later configs override earlier ones key by key, so a project file only
//! needs the values it changes.

use crate::config::schema::{config_home, AxiosConfig, CONFIG_DIR, CONFIG_FILE};
use crate::error::{ChatError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration loader that handles both user and project configs
pub struct ConfigLoader {
    user_config_path: PathBuf,
    project_config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            user_config_path: config_home().join(CONFIG_FILE),
            project_config_path: PathBuf::from(CONFIG_DIR).join(CONFIG_FILE),
        }
    }

    /// Loader over explicit paths.
    pub fn with_paths(user_config_path: impl Into<PathBuf>, project_config_path: impl Into<PathBuf>) -> Self {
        Self {
            user_config_path: user_config_path.into(),
            project_config_path: project_config_path.into(),
        }
    }

    /// Load configuration from both locations with project taking precedence
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub async fn load(&self) -> Result<AxiosConfig> {
        let mut merged = toml::Value::try_from(AxiosConfig::default())
            .map_err(|e| ChatError::Config(format!("Failed to render defaults: {}", e)))?;
        debug!("Loading configuration with defaults");

        for path in [&self.user_config_path, &self.project_config_path] {
            match self.load_table(path).await? {
                Some(table) => {
                    debug!(path = %path.display(), "Loaded config file");
                    merge_values(&mut merged, toml::Value::Table(table));
                }
                None => debug!(path = %path.display(), "Config file not found"),
            }
        }

        let mut config: AxiosConfig = merged
            .try_into()
            .map_err(|e| ChatError::Config(format!("Invalid configuration: {}", e)))?;
        config.resolve_env_vars();

        info!("Configuration loaded");
        Ok(config)
    }

    /// Read one file as a raw TOML table, `None` if it does not exist.
    async fn load_table(&self, path: &Path) -> Result<Option<toml::Table>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ChatError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| ChatError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(Some(table))
    }

    /// Get user config path
    pub fn user_config_path(&self) -> &Path {
        &self.user_config_path
    }

    /// Get project config path
    pub fn project_config_path(&self) -> &Path {
        &self.project_config_path
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge; everything else
/// is replaced.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversationProvider;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths() {
        let loader = ConfigLoader::new();
        assert!(loader.user_config_path().ends_with(".axioschat/axioschat.toml"));
        assert!(loader.project_config_path().ends_with(".axioschat/axioschat.toml"));
    }

    #[tokio::test]
    async fn test_load_returns_defaults_when_no_files() {
        let loader = ConfigLoader::with_paths("/nonexistent/user.toml", "/nonexistent/project.toml");
        let config = loader.load().await.unwrap();
        assert_eq!(config, AxiosConfig::default());
    }

    #[tokio::test]
    async fn test_project_overrides_user_key_by_key() {
        let temp_dir = TempDir::new().unwrap();
        let user_path = temp_dir.path().join("user.toml");
        let project_path = temp_dir.path().join("project.toml");

        fs::write(
            &user_path,
            r#"
[conversation]
model = "llama70b"
temperature = 0.2

[logging]
level = "debug"
"#,
        )
        .await
        .unwrap();

        fs::write(
            &project_path,
            r#"
[conversation]
temperature = 0.9

[executor]
latency_ms = 0
"#,
        )
        .await
        .unwrap();

        let config = ConfigLoader::with_paths(&user_path, &project_path)
            .load()
            .await
            .unwrap();

        // Project wins where both set a key
        assert_eq!(config.conversation.temperature, 0.9);
        // User value survives when the project is silent
        assert_eq!(config.conversation.model, "llama70b");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.executor.latency_ms, 0);
        // Defaults fill the rest
        assert_eq!(config.conversation.provider, ConversationProvider::Gaia);
        assert_eq!(config.resolver.max_retries, 2);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let user_path = temp_dir.path().join("user.toml");
        fs::write(&user_path, "[conversation\nmodel = ").await.unwrap();

        let result = ConfigLoader::with_paths(&user_path, "/nonexistent/project.toml")
            .load()
            .await;
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[tokio::test]
    async fn test_wrong_type_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let project_path = temp_dir.path().join("project.toml");
        fs::write(&project_path, "[executor]\nlatency_ms = \"slow\"").await.unwrap();

        let result = ConfigLoader::with_paths("/nonexistent/user.toml", &project_path)
            .load()
            .await;
        assert!(matches!(result, Err(ChatError::Config(msg)) if msg.contains("Invalid configuration")));
    }

    #[test]
    fn test_merge_values_replaces_arrays() {
        let mut base: toml::Value = toml::from_str("urls = [\"a\", \"b\"]\n[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("urls = [\"c\"]\n[t]\ny = 3").unwrap();
        merge_values(&mut base, overlay);

        assert_eq!(base["urls"].as_array().unwrap().len(), 1);
        assert_eq!(base["t"]["x"].as_integer(), Some(1));
        assert_eq!(base["t"]["y"].as_integer(), Some(3));
    }
}
