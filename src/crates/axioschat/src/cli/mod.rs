//! Terminal front end: REPL, one-shot questions, key management and logging.

pub mod chat;
pub mod keys;
pub mod logging;

pub use chat::{run_ask, run_repl, ReplCommand};
pub use keys::{handle_set, handle_show};
pub use logging::init_logging;
