//! Configuration management for AxiosChat

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    config_home, AxiosConfig, ConversationConfig, ConversationProvider, CredentialsConfig,
    ExecutorConfig, LoggingConfig, ResolverConfig, SessionConfig,
};
