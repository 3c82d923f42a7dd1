//! Function execution.
//!
//! [`FunctionExecutor`] is the seam where a real chain client would plug in.
//! [`MockChainExecutor`] answers from fixed lookup tables with random jitter
//! for anything it does not know, after a simulated network delay.

use crate::error::Result;
use crate::functions::{FunctionCall, Web3Function};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Default simulated latency for the mock executor.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Performs the effect of a function call and returns its result payload.
#[async_trait]
pub trait FunctionExecutor: Send + Sync {
    async fn execute(&self, call: &FunctionCall) -> Result<Value>;
}

/// Result payloads, one shape per function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionOutput {
    TokenPrice {
        price: f64,
        currency: &'static str,
        timestamp: i64,
    },
    GasPrice {
        price: f64,
        unit: &'static str,
        timestamp: i64,
    },
    Transfer {
        #[serde(rename = "txHash")]
        tx_hash: String,
        status: &'static str,
        timestamp: i64,
    },
    Swap {
        #[serde(rename = "txHash")]
        tx_hash: String,
        #[serde(rename = "amountOut")]
        amount_out: String,
        status: &'static str,
        timestamp: i64,
    },
    Liquidity {
        #[serde(rename = "txHash")]
        tx_hash: String,
        #[serde(rename = "lpTokens")]
        lp_tokens: String,
        status: &'static str,
        timestamp: i64,
    },
    Balance {
        balance: f64,
        token: String,
        wallet_address: String,
        token_address: String,
        timestamp: i64,
        debug_info: Value,
    },
    TransactionInfo {
        #[serde(rename = "type")]
        kind: &'static str,
        value: String,
        status: &'static str,
        timestamp: i64,
    },
    GasEstimate {
        gas: u64,
        #[serde(rename = "gasPrice")]
        gas_price: u64,
        #[serde(rename = "totalCost")]
        total_cost: String,
        timestamp: i64,
    },
    NotImplemented {
        error: &'static str,
        timestamp: i64,
    },
}

/// Mock executor backed by lookup tables.
#[derive(Debug, Clone)]
pub struct MockChainExecutor {
    latency: Duration,
}

impl Default for MockChainExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl MockChainExecutor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// No simulated delay.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl FunctionExecutor for MockChainExecutor {
    async fn execute(&self, call: &FunctionCall) -> Result<Value> {
        info!(function = %call.name, id = %call.id, "Executing function");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let output = mock_output(call, &mut rand::thread_rng());
        let value = serde_json::to_value(output)?;
        debug!(function = %call.name, result = %value, "Function executed");
        Ok(value)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn token_price(symbol: &str) -> Option<f64> {
    match symbol {
        "BTC" => Some(65432.78),
        "ETH" => Some(3456.89),
        "BNB" => Some(567.23),
        "SOL" => Some(145.67),
        "AVAX" => Some(34.56),
        "MATIC" => Some(0.89),
        "DOT" => Some(7.65),
        "ADA" => Some(0.45),
        "XRP" => Some(0.56),
        _ => None,
    }
}

fn gas_price(chain: &str) -> Option<f64> {
    match chain {
        "ethereum" => Some(25.0),
        "binance" => Some(5.0),
        "polygon" => Some(80.0),
        "avalanche" => Some(30.0),
        "solana" => Some(0.001),
        "arbitrum" => Some(0.1),
        "optimism" => Some(0.05),
        _ => None,
    }
}

fn token_balance(token_address: &str) -> Option<f64> {
    match token_address {
        "native" => Some(42.38),
        // WBNB
        "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c" => Some(156.78),
        // USDT on BSC
        "0x55d398326f99059fF775485246999027B3197955" => Some(1250.45),
        // USDC on BSC
        "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d" => Some(980.23),
        // ETH on BSC
        "0x2170Ed0880ac9A755fd29B2688956BD959F933F8" => Some(5.67),
        _ => None,
    }
}

fn random_tx_hash<R: Rng>(rng: &mut R) -> String {
    let digits: String = (0..64)
        .map(|_| std::char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect();
    format!("0x{}", digits)
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

fn amount_arg(call: &FunctionCall, key: &str) -> f64 {
    call.arg_str(key)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(1.0)
}

/// Build the mock result for `call`.
pub fn mock_output<R: Rng>(call: &FunctionCall, rng: &mut R) -> FunctionOutput {
    let timestamp = now_millis();

    let Some(function) = Web3Function::from_name(&call.name) else {
        return FunctionOutput::NotImplemented {
            error: "Function not implemented",
            timestamp,
        };
    };

    match function {
        Web3Function::GetTokenPrice => {
            let symbol = call
                .arg_str("token_symbol")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|| "BTC".to_string());
            FunctionOutput::TokenPrice {
                price: token_price(&symbol)
                    .unwrap_or_else(|| (rng.gen::<f64>() * 10_000.0).floor() / 100.0),
                currency: "USD",
                timestamp,
            }
        }
        Web3Function::GetGasPrice => {
            let chain = call
                .arg_str("chain")
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| "binance".to_string());
            FunctionOutput::GasPrice {
                price: gas_price(&chain).unwrap_or_else(|| (rng.gen::<f64>() * 100.0).floor()),
                unit: "Gwei",
                timestamp,
            }
        }
        Web3Function::SendToken => FunctionOutput::Transfer {
            tx_hash: random_tx_hash(rng),
            status: "pending",
            timestamp,
        },
        Web3Function::SwapTokens => {
            let amount_in = amount_arg(call, "amount_in");
            FunctionOutput::Swap {
                tx_hash: random_tx_hash(rng),
                amount_out: format!("{:.6}", amount_in * rng.gen_range(0.9..1.1)),
                status: "pending",
                timestamp,
            }
        }
        Web3Function::AddLiquidity => {
            let amount_a = amount_arg(call, "amount_a");
            FunctionOutput::Liquidity {
                tx_hash: random_tx_hash(rng),
                lp_tokens: format!("{:.6}", amount_a * rng.gen::<f64>()),
                status: "pending",
                timestamp,
            }
        }
        Web3Function::GetTokenBalance => {
            let token_address = call
                .arg_str("token_address")
                .unwrap_or_else(|| "native".to_string());
            let balance = token_balance(&token_address)
                .unwrap_or_else(|| round6(rng.gen::<f64>() * 100.0));
            FunctionOutput::Balance {
                balance,
                token: if token_address == "native" { "BNB" } else { "TOKEN" }.to_string(),
                wallet_address: call
                    .arg_str("wallet_address")
                    .unwrap_or_else(|| "0x1234...abcd".to_string()),
                token_address,
                timestamp,
                debug_info: json!({
                    "function_name": call.name,
                    "arguments": call.arguments,
                    "mock_data": true,
                }),
            }
        }
        Web3Function::ExplainTransaction => FunctionOutput::TransactionInfo {
            kind: if rng.gen_bool(0.5) { "Transfer" } else { "Contract Interaction" },
            value: format!("{:.4} ETH", rng.gen::<f64>() * 10.0),
            status: if rng.gen_bool(0.8) { "Success" } else { "Failed" },
            timestamp: timestamp - rng.gen_range(0..1_000_000),
        },
        Web3Function::EstimateGas => FunctionOutput::GasEstimate {
            gas: 21_000 + rng.gen_range(0..100_000),
            gas_price: rng.gen_range(0..100),
            total_cost: format!("{:.6} ETH", rng.gen::<f64>() * 0.1),
            timestamp,
        },
    }
}
