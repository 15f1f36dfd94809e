use serde::{Deserialize, Serialize};

use super::token::TokenIdentifier;

/// USD-equivalent comparison of two tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub usd_amount: f64,
    pub source: TokenIdentifier,
    pub target: TokenIdentifier,
    pub source_amount: Option<f64>, // Source tokens worth `usd_amount`
    pub target_amount: Option<f64>, // Target tokens worth `usd_amount`
    pub ratio: Option<f64>,         // Target units per source unit
}
