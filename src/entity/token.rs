use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity key for every lookup: the same symbol may live on several chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentifier {
    pub chain_id: String, // Chain ID as the provider expects it (e.g. "1", "137")
    pub symbol: String,   // Token symbol (e.g. "USDC")
}

impl TokenIdentifier {
    pub fn new(chain_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            symbol: symbol.into(),
        }
    }

    /// Both parts must be non-blank before a provider is contacted.
    pub fn is_well_formed(&self) -> bool {
        !self.chain_id.trim().is_empty() && !self.symbol.trim().is_empty()
    }
}

impl fmt::Display for TokenIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} on chain {}", self.symbol, self.chain_id)
    }
}

/// Catalog record for a token the application knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedToken {
    pub name: String,       // Full token name
    pub symbol: String,     // Token symbol
    pub chain_id: String,   // Chain ID
    pub chain_name: String, // Human readable chain name
}

impl SupportedToken {
    pub fn identifier(&self) -> TokenIdentifier {
        TokenIdentifier::new(self.chain_id.clone(), self.symbol.clone())
    }
}
