//! Tracing subscriber setup for the binary.

use crate::config::LoggingConfig;
use crate::error::{ChatError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so it
/// does not interleave with the conversation on stdout.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ChatError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        other => {
            return Err(ChatError::Config(format!(
                "Unknown log format '{}'. Available: compact, pretty, json",
                other
            )))
        }
    };

    installed.map_err(|e| ChatError::Config(format!("Failed to install logger: {}", e)))
}
