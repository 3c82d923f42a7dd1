//! # AxiosChat - Multi-Model Web3 Chat Assistant
//!
//! AxiosChat answers questions about blockchains and carries out on-chain
//! actions by orchestrating two models per turn:
//!
//! - A **conversational model** (Gaia Network, or a local Ollama model) that
//!   replies in natural language and flags when a blockchain function is
//!   needed.
//! - A **tool-resolution model** (Flock Web3 on Replicate) that turns the
//!   user's words into a concrete function call.
//!
//! Read-only calls such as price or balance lookups run immediately.
//! Anything that moves funds is queued until the user approves it. Results
//! are explained back to the user by the conversational model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axioschat::config::ConfigLoader;
//! use axioschat::providers;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConfigLoader::new().load().await?;
//! let credentials = providers::credential_store(&config)?;
//! let mut session = providers::session(&config, credentials)?;
//!
//! if let Some(turn) = session.submit("What's the price of ETH?").await? {
//!     println!("{}", turn.reply);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod credentials;
pub mod executor;
pub mod functions;
pub mod pipeline;
pub mod providers;
pub mod session;

// Error types and utilities
mod error;

pub use error::{ChatError, Result};

pub use config::{AxiosConfig, ConfigLoader};
pub use credentials::{
    CredentialError, CredentialKind, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use executor::{FunctionExecutor, FunctionOutput, MockChainExecutor};
pub use functions::{FunctionCall, FunctionStatus, Web3Function};
pub use session::{CallDisposition, ChatSession, SessionMessage, SessionOptions, TurnOutcome};
