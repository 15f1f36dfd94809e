use serde::{Deserialize, Serialize};

use super::token::TokenIdentifier;

/// On-chain descriptive facts about a token at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: String, // Contract address
    pub chain: String,   // Chain the provider reported
    pub decimals: u8,    // Number of decimal places
    pub name: String,    // Full token name
    pub symbol: String,  // Token symbol
}

/// Current USD valuation of a token. `unit_price` is always finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    pub unit_price: f64, // USD per token unit
    pub amount: f64,     // Amount the quote was made for
    pub total: f64,      // unit_price * amount
}

/// Metadata and price for one identifier, composed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenWithPrice {
    pub chain_id: String,
    pub symbol: String,
    pub token_info: TokenMetadata,
    pub price_info: TokenPrice,
}

impl TokenWithPrice {
    pub fn new(token: &TokenIdentifier, token_info: TokenMetadata, price_info: TokenPrice) -> Self {
        Self {
            chain_id: token.chain_id.clone(),
            symbol: token.symbol.clone(),
            token_info,
            price_info,
        }
    }

    pub fn matches(&self, token: &TokenIdentifier) -> bool {
        self.chain_id == token.chain_id && self.symbol == token.symbol
    }
}
