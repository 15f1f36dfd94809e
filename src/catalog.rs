use lazy_static::lazy_static;

use crate::entity::{SupportedToken, TokenIdentifier};

fn token(name: &str, symbol: &str, chain_id: &str, chain_name: &str) -> SupportedToken {
    SupportedToken {
        name: name.to_string(),
        symbol: symbol.to_string(),
        chain_id: chain_id.to_string(),
        chain_name: chain_name.to_string(),
    }
}

lazy_static! {
    /// Tokens the application offers, fixed at startup.
    pub static ref SUPPORTED_TOKENS: Vec<SupportedToken> = vec![
        token("USD Coin", "USDC", "1", "Ethereum"),
        token("Tether USD", "USDT", "137", "Polygon"),
        token("Ether", "ETH", "8453", "Base"),
        token("Wrapped BTC", "WBTC", "1", "Ethereum"),
    ];
}

/// Identifiers for the whole catalog, in catalog order.
pub fn supported_identifiers() -> Vec<TokenIdentifier> {
    SUPPORTED_TOKENS.iter().map(SupportedToken::identifier).collect()
}

/// Case-insensitive lookup by symbol; the first catalog entry wins.
pub fn find_by_symbol(symbol: &str) -> Option<&'static SupportedToken> {
    SUPPORTED_TOKENS
        .iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
}
