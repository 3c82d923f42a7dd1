//! Remote LLM provider implementations.
//!
//! - **OpenAI-compatible**: chat completions against Gaia Network (Qwen) or
//!   any proxy exposing the same wire format.
//! - **Replicate**: predictions against the Flock Web3 tool-calling model.

pub mod openai;
pub mod replicate;

pub use openai::{OpenAiClient, GAIA_CREDENTIAL};
pub use replicate::{ReplicateClient, FLOCK_WEB3_VERSION, REPLICATE_CREDENTIAL};
