//! Filling in arguments the resolver left out.
//!
//! The resolver model often omits arguments that are plainly visible in the
//! user's message ("what's my BNB balance for 0x...?"). [`enrich_arguments`]
//! pulls a few well-known hints out of the utterance and then applies
//! per-function defaults. Arguments already present are never overwritten.

use super::call::FunctionCall;
use super::catalog::Web3Function;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

const TOKEN_SYMBOLS: &str = "BTC|ETH|BNB|USDT|USDC|DAI|LINK|UNI|AAVE|CAKE|MATIC|SOL|DOT|ADA|XRP|DOGE|SHIB";

static WALLET_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0x[a-fA-F0-9]{40}\b").unwrap());

static TX_HASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0x[a-fA-F0-9]{64}\b").unwrap());

static TOKEN_SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b({})\b", TOKEN_SYMBOLS)).unwrap());

static AMOUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(\d+(?:\.\d+)?)\s*({})?\b", TOKEN_SYMBOLS)).unwrap()
});

/// Values recognised in free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentHints {
    pub wallet_address: Option<String>,
    pub transaction_hash: Option<String>,
    pub token_symbol: Option<String>,
    pub amount: Option<String>,
}

impl ArgumentHints {
    pub fn from_text(text: &str) -> Self {
        let wallet_address = WALLET_ADDRESS_REGEX.find(text).map(|m| m.as_str().to_string());
        let transaction_hash = TX_HASH_REGEX.find(text).map(|m| m.as_str().to_string());
        let mut token_symbol = TOKEN_SYMBOL_REGEX
            .find(text)
            .map(|m| m.as_str().to_uppercase());

        let mut amount = None;
        if let Some(caps) = AMOUNT_REGEX.captures(text) {
            amount = caps.get(1).map(|m| m.as_str().to_string());
            if token_symbol.is_none() {
                token_symbol = caps.get(2).map(|m| m.as_str().to_uppercase());
            }
        }

        Self {
            wallet_address,
            transaction_hash,
            token_symbol,
            amount,
        }
    }
}

/// Fill missing arguments of `call` from `utterance`, then from defaults.
pub fn enrich_arguments(call: &mut FunctionCall, utterance: &str) {
    let Some(function) = Web3Function::from_name(&call.name) else {
        return;
    };
    let hints = ArgumentHints::from_text(utterance);

    let from_text: Vec<(&str, Option<&String>)> = match function {
        Web3Function::GetTokenBalance => vec![("wallet_address", hints.wallet_address.as_ref())],
        Web3Function::GetTokenPrice => vec![("token_symbol", hints.token_symbol.as_ref())],
        Web3Function::SendToken => vec![
            ("to_address", hints.wallet_address.as_ref()),
            ("amount", hints.amount.as_ref()),
        ],
        Web3Function::SwapTokens => vec![
            ("token_in", hints.token_symbol.as_ref()),
            ("amount_in", hints.amount.as_ref()),
        ],
        Web3Function::ExplainTransaction => {
            vec![("transaction_hash", hints.transaction_hash.as_ref())]
        }
        Web3Function::EstimateGas => vec![("to_address", hints.wallet_address.as_ref())],
        Web3Function::GetGasPrice | Web3Function::AddLiquidity => vec![],
    };

    let mut filled = Vec::new();
    for (key, value) in from_text {
        if let Some(value) = value {
            if fill(call, key, value) {
                filled.push(key);
            }
        }
    }
    for (key, value) in defaults(function) {
        if fill(call, key, value) {
            filled.push(*key);
        }
    }

    if !filled.is_empty() {
        debug!(function = %call.name, filled = ?filled, "Enriched function arguments");
    }
}

/// Per-function fallback values.
fn defaults(function: Web3Function) -> &'static [(&'static str, &'static str)] {
    match function {
        Web3Function::GetTokenBalance => &[
            ("wallet_address", "0xYourWalletAddressHere"),
            ("token_address", "native"),
        ],
        Web3Function::GetTokenPrice => &[("token_symbol", "BNB")],
        Web3Function::GetGasPrice => &[("chain", "ethereum")],
        Web3Function::SendToken => &[
            ("to_address", "0xRecipientAddressHere"),
            ("amount", "0.1"),
            ("token_address", "native"),
        ],
        Web3Function::SwapTokens => &[
            ("token_in", "BNB"),
            ("token_out", "BUSD"),
            ("amount_in", "0.1"),
            ("slippage", "0.5"),
        ],
        _ => &[],
    }
}

/// Insert `value` under `key` when the argument is absent or blank.
fn fill(call: &mut FunctionCall, key: &str, value: &str) -> bool {
    let missing = match call.arguments.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if missing {
        call.arguments.insert(key.to_string(), Value::String(value.to_string()));
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn call(name: &str, args: Value) -> FunctionCall {
        let args: Map<String, Value> = serde_json::from_value(args).unwrap();
        FunctionCall::new(name, args)
    }

    #[test]
    fn test_hints_from_text() {
        let hints = ArgumentHints::from_text(&format!("send 2.5 eth to {}", WALLET));
        assert_eq!(hints.wallet_address.as_deref(), Some(WALLET));
        assert_eq!(hints.token_symbol.as_deref(), Some("ETH"));
        assert_eq!(hints.amount.as_deref(), Some("2.5"));
        assert_eq!(hints.transaction_hash, None);
    }

    #[test]
    fn test_hints_ignore_digits_inside_addresses() {
        let hints = ArgumentHints::from_text(&format!("balance of {}", WALLET));
        assert_eq!(hints.amount, None);
    }

    #[test]
    fn test_tx_hash_is_not_a_wallet() {
        let hash = format!("0x{}", "ab".repeat(32));
        let hints = ArgumentHints::from_text(&format!("explain {}", hash));
        assert_eq!(hints.transaction_hash.as_deref(), Some(hash.as_str()));
        assert_eq!(hints.wallet_address, None);
    }

    #[test]
    fn test_balance_defaults() {
        let mut c = call("get_token_balance", json!({}));
        enrich_arguments(&mut c, "what's my BNB balance?");
        assert_eq!(c.arguments["token_address"], "native");
        assert_eq!(c.arguments["wallet_address"], "0xYourWalletAddressHere");
    }

    #[test]
    fn test_wallet_from_utterance() {
        let mut c = call("get_token_balance", json!({"token_address": "native"}));
        enrich_arguments(&mut c, &format!("balance for {}", WALLET));
        assert_eq!(c.arguments["wallet_address"], WALLET);
    }

    #[test]
    fn test_resolver_arguments_never_overwritten() {
        let mut c = call("get_token_price", json!({"token_symbol": "SOL"}));
        enrich_arguments(&mut c, "price of ETH");
        assert_eq!(c.arguments["token_symbol"], "SOL");

        let mut swap = call("swap_tokens", json!({"token_out": "CAKE", "amount_in": 3}));
        enrich_arguments(&mut swap, "swap 1 BNB");
        assert_eq!(swap.arguments["amount_in"], 3);
        assert_eq!(swap.arguments["token_out"], "CAKE");
        assert_eq!(swap.arguments["token_in"], "BNB");
        assert_eq!(swap.arguments["slippage"], "0.5");
    }

    #[test]
    fn test_blank_argument_counts_as_missing() {
        let mut c = call("get_gas_price", json!({"chain": ""}));
        enrich_arguments(&mut c, "gas?");
        assert_eq!(c.arguments["chain"], "ethereum");
    }

    #[test]
    fn test_unknown_function_untouched() {
        let mut c = call("bridge_tokens", json!({}));
        enrich_arguments(&mut c, &format!("bridge 5 ETH to {}", WALLET));
        assert!(c.arguments.is_empty());
    }
}
