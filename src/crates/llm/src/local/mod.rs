//! Local LLM provider implementations.
//!
//! Local providers run on the developer's machine and need no credential.

pub mod ollama;

pub use ollama::OllamaClient;
