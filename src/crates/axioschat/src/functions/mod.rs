//! Blockchain functions: catalog, calls, and resolver output handling.

mod call;
mod catalog;
mod extract;
mod parse;

pub use call::{FunctionCall, FunctionStatus};
pub use catalog::{
    default_tools, default_tools_json, is_read_only, FunctionSchema, ToolSchema, Web3Function,
};
pub use extract::{enrich_arguments, ArgumentHints};
pub use parse::{parse_resolver_output, ResolverOutcome};
