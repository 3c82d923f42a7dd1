//! Function calls and their lifecycle.
//!
//! ```text
//! pending ──(read-only)──────────────► executed
//!    │                                    ▲
//!    └──► approved ───────────────────────┘
//!    │       │
//!    └───────┴──► rejected
//! ```
//!
//! `executed` and `rejected` are terminal. Transitions are methods on
//! [`FunctionCall`]; an illegal one returns `ChatError::InvalidTransition`
//! and leaves the call untouched.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Lifecycle state of a function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

impl FunctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionStatus::Pending => "pending",
            FunctionStatus::Approved => "approved",
            FunctionStatus::Rejected => "rejected",
            FunctionStatus::Executed => "executed",
        }
    }
}

impl fmt::Display for FunctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved blockchain function invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    pub description: String,
    pub arguments: Map<String, Value>,
    pub status: FunctionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl FunctionCall {
    /// Create a pending call with a fresh id.
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        let name = name.into();
        Self {
            id: format!("func-{}", uuid::Uuid::new_v4()),
            description: format!("Execute {} function", name),
            name,
            arguments,
            status: FunctionStatus::Pending,
            result: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = description;
        }
        self
    }

    /// String argument lookup; numbers are rendered as text.
    pub fn arg_str(&self, key: &str) -> Option<String> {
        match self.arguments.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Mark a pending call as approved by the user.
    pub fn approve(&mut self) -> Result<()> {
        self.transition(FunctionStatus::Approved, &[FunctionStatus::Pending])
    }

    /// Record a successful execution.
    ///
    /// Allowed from `approved`, and from `pending` only for auto-executed
    /// read-only calls; the gate is the caller's responsibility.
    pub fn mark_executed(&mut self, result: Value) -> Result<()> {
        self.transition(
            FunctionStatus::Executed,
            &[FunctionStatus::Pending, FunctionStatus::Approved],
        )?;
        self.result = Some(result);
        Ok(())
    }

    /// Reject the call, recording why in `result.error`.
    pub fn reject(&mut self, error: impl Into<String>) -> Result<()> {
        self.transition(
            FunctionStatus::Rejected,
            &[FunctionStatus::Pending, FunctionStatus::Approved],
        )?;
        self.result = Some(json!({ "error": error.into() }));
        Ok(())
    }

    fn transition(&mut self, to: FunctionStatus, allowed_from: &[FunctionStatus]) -> Result<()> {
        if !allowed_from.contains(&self.status) {
            return Err(ChatError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
