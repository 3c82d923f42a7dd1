//! Parsing the tool-resolution model's output into function calls.
//!
//! The Flock Web3 model does not answer in one stable shape. Observed
//! variants include:
//!
//! - prose, e.g. `"I can't help with that"`
//! - a JSON-encoded array of JSON-encoded strings:
//!   `"[\"{\\\"name\\\": \\\"get_gas_price\\\", ...}\"]"`
//! - a JSON array of objects, or of encoded strings
//! - OpenAI-style `{"type": "function", "function": {"name", "arguments"}}`
//!   where `arguments` may itself be an encoded string
//!
//! [`parse_resolver_output`] tries these in order and returns the first
//! structurally valid interpretation, or an explicit non-call outcome. It is
//! pure: the same input always yields the same outcome.

use super::call::FunctionCall;
use serde_json::{Map, Value};
use tracing::debug;

/// Nesting allowed for encoded-string-within-array unwrapping.
const MAX_DECODE_DEPTH: usize = 3;

/// Outcome of interpreting resolver output.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverOutcome {
    /// At least one well-formed function reference.
    Calls(Vec<FunctionCall>),
    /// The model answered in prose rather than JSON.
    Text(String),
    /// JSON, but nothing in it describes a function call.
    Unrecognized,
}

impl ResolverOutcome {
    pub fn into_calls(self) -> Vec<FunctionCall> {
        match self {
            ResolverOutcome::Calls(calls) => calls,
            _ => Vec::new(),
        }
    }
}

/// Interpret the `output` value returned by the resolver model.
pub fn parse_resolver_output(output: &Value) -> ResolverOutcome {
    let candidates = match output {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded) => expand(decoded, 1),
            Err(_) => {
                debug!("Resolver output is not JSON, treating as text");
                return ResolverOutcome::Text(raw.clone());
            }
        },
        other => expand(other.clone(), 0),
    };

    let calls: Vec<FunctionCall> = candidates
        .iter()
        .filter(|v| looks_like_function(v))
        .filter_map(normalize)
        .collect();

    debug!(candidates = candidates.len(), calls = calls.len(), "Parsed resolver output");

    if calls.is_empty() {
        ResolverOutcome::Unrecognized
    } else {
        ResolverOutcome::Calls(calls)
    }
}

/// Flatten arrays and decode JSON-encoded strings into candidate values.
fn expand(value: Value, depth: usize) -> Vec<Value> {
    if depth > MAX_DECODE_DEPTH {
        return Vec::new();
    }
    match value {
        Value::Array(items) => items
            .into_iter()
            .flat_map(|item| expand(item, depth + 1))
            .collect(),
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(decoded) => expand(decoded, depth + 1),
            // Undecodable elements are dropped
            Err(_) => Vec::new(),
        },
        other => vec![other],
    }
}

fn looks_like_function(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.contains_key("name")
        || obj.contains_key("function")
        || obj.get("type").and_then(Value::as_str) == Some("function")
}

/// Normalize one candidate object, or `None` if it is not structurally valid.
fn normalize(value: &Value) -> Option<FunctionCall> {
    let obj = value.as_object()?;

    let (name, description, arguments) = match obj.get("function").and_then(Value::as_object) {
        Some(func) => (
            func.get("name"),
            func.get("description"),
            func.get("arguments"),
        ),
        None => (
            obj.get("name"),
            obj.get("description"),
            obj.get("arguments").or_else(|| obj.get("args")),
        ),
    };

    let name = name.and_then(Value::as_str).map(str::trim).filter(|n| !n.is_empty())?;
    let arguments = decode_arguments(arguments)?;
    let description = description.and_then(Value::as_str).unwrap_or_default();

    Some(FunctionCall::new(name, arguments).with_description(description))
}

fn decode_arguments(arguments: Option<&Value>) -> Option<Map<String, Value>> {
    match arguments {
        None | Some(Value::Null) => Some(Map::new()),
        Some(Value::Object(map)) => Some(map.clone()),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Map::new()),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        Some(_) => None,
    }
}
