//! The blockchain functions the assistant knows about.
//!
//! Each [`Web3Function`] carries its tool schema (what the resolver model
//! sees), its read-only flag (what the gate checks) and, via the executor, its
//! result shape. Names that are not in the catalog can still be resolved and
//! queued; they always need approval and execute to a "not implemented"
//! payload.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Known blockchain functions, keyed by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Web3Function {
    GetTokenPrice,
    GetGasPrice,
    SendToken,
    SwapTokens,
    AddLiquidity,
    GetTokenBalance,
    ExplainTransaction,
    EstimateGas,
}

impl Web3Function {
    pub fn all() -> [Web3Function; 8] {
        [
            Web3Function::GetTokenPrice,
            Web3Function::GetGasPrice,
            Web3Function::SendToken,
            Web3Function::SwapTokens,
            Web3Function::AddLiquidity,
            Web3Function::GetTokenBalance,
            Web3Function::ExplainTransaction,
            Web3Function::EstimateGas,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Web3Function::GetTokenPrice => "get_token_price",
            Web3Function::GetGasPrice => "get_gas_price",
            Web3Function::SendToken => "send_token",
            Web3Function::SwapTokens => "swap_tokens",
            Web3Function::AddLiquidity => "add_liquidity",
            Web3Function::GetTokenBalance => "get_token_balance",
            Web3Function::ExplainTransaction => "explain_transaction",
            Web3Function::EstimateGas => "estimate_gas",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|f| f.name() == name)
    }

    /// Queries that are safe to run without asking the user.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Web3Function::GetTokenBalance
                | Web3Function::GetTokenPrice
                | Web3Function::GetGasPrice
                | Web3Function::ExplainTransaction
                | Web3Function::EstimateGas
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Web3Function::GetTokenPrice => "Get the price of a token in USD",
            Web3Function::GetGasPrice => "Get the current gas price in Gwei",
            Web3Function::SendToken => "Send tokens to an address",
            Web3Function::SwapTokens => "Swap tokens on a decentralized exchange",
            Web3Function::AddLiquidity => "Add liquidity to a DEX pool",
            Web3Function::GetTokenBalance => "Get token balance for an address",
            Web3Function::ExplainTransaction => "Explain a blockchain transaction",
            Web3Function::EstimateGas => "Estimate gas cost for a transaction",
        }
    }

    /// Parameters as `(name, description)` pairs, and which are required.
    fn parameters(&self) -> (&'static [(&'static str, &'static str)], &'static [&'static str]) {
        match self {
            Web3Function::GetTokenPrice => (
                &[("token_symbol", "The token symbol (e.g., ETH, BTC, SOL)")],
                &["token_symbol"],
            ),
            Web3Function::GetGasPrice => (
                &[("chain", "The blockchain to get gas price for (e.g., ethereum, binance)")],
                &["chain"],
            ),
            Web3Function::SendToken => (
                &[
                    ("token_address", "The token address (use 'native' for ETH, BNB, etc.)"),
                    ("to_address", "The recipient address"),
                    ("amount", "The amount to send"),
                ],
                &["token_address", "to_address", "amount"],
            ),
            Web3Function::SwapTokens => (
                &[
                    ("token_in", "The input token address or symbol"),
                    ("token_out", "The output token address or symbol"),
                    ("amount_in", "The input amount"),
                ],
                &["token_in", "token_out", "amount_in"],
            ),
            Web3Function::AddLiquidity => (
                &[
                    ("token_a", "First token address or symbol"),
                    ("token_b", "Second token address or symbol"),
                    ("amount_a", "Amount of first token"),
                    ("amount_b", "Amount of second token"),
                ],
                &["token_a", "token_b", "amount_a", "amount_b"],
            ),
            Web3Function::GetTokenBalance => (
                &[
                    ("token_address", "The token address (use 'native' for ETH, BNB, etc.)"),
                    ("wallet_address", "The wallet address to check balance for"),
                ],
                &["token_address", "wallet_address"],
            ),
            Web3Function::ExplainTransaction => (
                &[
                    ("transaction_hash", "The transaction hash to explain"),
                    ("chain_id", "The chain ID (e.g., 1 for Ethereum, 56 for BSC)"),
                ],
                &["transaction_hash", "chain_id"],
            ),
            Web3Function::EstimateGas => (
                &[
                    ("from_address", "The sender address"),
                    ("to_address", "The recipient address"),
                    ("data", "The transaction data (hex)"),
                    ("value", "The transaction value in wei"),
                ],
                &["from_address", "to_address"],
            ),
        }
    }

    pub fn required_parameters(&self) -> &'static [&'static str] {
        self.parameters().1
    }

    /// OpenAI-style tool schema for this function.
    pub fn schema(&self) -> ToolSchema {
        let (params, required) = self.parameters();
        let properties: serde_json::Map<String, Value> = params
            .iter()
            .map(|(name, description)| {
                (
                    name.to_string(),
                    json!({"type": "string", "description": description}),
                )
            })
            .collect();

        ToolSchema {
            kind: "function",
            function: FunctionSchema {
                name: self.name(),
                description: self.description(),
                parameters: json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }),
            },
        }
    }
}

impl fmt::Display for Web3Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Web3Function {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown function: {}", s))
    }
}

/// The read-only gate: true when `name` may run without user approval.
///
/// Unknown names are never read-only.
pub fn is_read_only(name: &str) -> bool {
    Web3Function::from_name(name).is_some_and(|f| f.is_read_only())
}

/// A tool description as sent to the resolver model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Schemas for every known function, in catalog order.
pub fn default_tools() -> Vec<ToolSchema> {
    Web3Function::all().iter().map(Web3Function::schema).collect()
}

/// The tool list serialized the way the resolver expects it: a JSON string.
pub fn default_tools_json() -> String {
    serde_json::to_string(&default_tools()).unwrap_or_else(|_| "[]".to_string())
}
