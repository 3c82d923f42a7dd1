//! Prompt text for the conversational model.

use serde_json::{Map, Value};

/// Marker the conversational model appends when a blockchain function is needed.
pub const FUNCTION_NEEDED_SENTINEL: &str = "[FUNCTION_NEEDED]";

/// System instruction for intent classification.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are Axioschat, a specialized Web3 assistant with deep knowledge of blockchain, cryptocurrencies, DeFi, NFTs, and smart contracts.

Your ONLY job is to determine if the user's request requires calling a blockchain function.

If the user asks for information that requires accessing blockchain data (like balances, prices, etc.), respond with:
1. A brief message indicating you need to check that information
2. Include the tag [FUNCTION_NEEDED] at the end of your message

Available functions:
- get_token_balance - For checking token balances
- get_token_price - For checking token prices
- get_gas_price - For checking gas prices
- send_token - For sending tokens
- swap_tokens - For swapping tokens
- add_liquidity - For adding liquidity

Example:
User: "What's my BNB balance?"
You: "Let me check your BNB balance for you. [FUNCTION_NEEDED]"

User: "Tell me about Ethereum"
You: "Ethereum is a decentralized blockchain platform that enables the creation of smart contracts and decentralized applications (dApps)..."

DO NOT try to execute functions yourself. DO NOT include any specific function names in your response.
DO NOT make up any blockchain data. ONLY identify if a function call is needed."#;

/// System instruction for result interpretation, with the call inlined.
pub fn interpretation_system_prompt(
    function_name: &str,
    arguments: &Map<String, Value>,
    result: &Value,
) -> String {
    format!(
        "You are Axioschat, a specialized Web3 assistant. You've just received the result of a function call.

Interpret the function result and respond in a natural, conversational way. Focus on explaining what the data means for the user in plain language.

Be concise and direct. Don't just repeat the raw data - explain its significance in a helpful way.

Function: {}
Arguments: {}
Result: {}",
        function_name,
        Value::Object(arguments.clone()),
        result
    )
}

/// The user turn of the interpretation request.
pub fn interpretation_user_prompt(question: Option<&str>) -> String {
    match question {
        Some(q) => format!(
            "The user asked: \"{}\". Please interpret the function result in a helpful way.",
            q
        ),
        None => "Please interpret the function result in a helpful way.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifier_prompt_mentions_sentinel() {
        assert!(CLASSIFIER_SYSTEM_PROMPT.contains(FUNCTION_NEEDED_SENTINEL));
    }

    #[test]
    fn test_interpretation_prompt_inlines_call() {
        let mut args = Map::new();
        args.insert("chain".into(), json!("ethereum"));
        let prompt = interpretation_system_prompt("get_gas_price", &args, &json!({"price": 25}));
        assert!(prompt.contains("Function: get_gas_price"));
        assert!(prompt.contains(r#"Arguments: {"chain":"ethereum"}"#));
        assert!(prompt.contains(r#"Result: {"price":25}"#));
    }

    #[test]
    fn test_user_prompt_with_and_without_question() {
        assert_eq!(
            interpretation_user_prompt(Some("gas?")),
            "The user asked: \"gas?\". Please interpret the function result in a helpful way."
        );
        assert_eq!(
            interpretation_user_prompt(None),
            "Please interpret the function result in a helpful way."
        );
    }
}
