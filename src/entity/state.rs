use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::price_error::{ErrorKind, PriceError};
use super::token_price::TokenWithPrice;

/// Phase of the refresh state machine. A successful cycle lands back in `Idle`
/// with a fresh `last_updated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPhase {
    #[default]
    Idle,
    Fetching,
    Error,
}

/// Error as the refresh layer surfaces it to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&PriceError> for RefreshFailure {
    fn from(err: &PriceError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Everything the refresh controller publishes after each transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub phase: RefreshPhase,
    pub tokens: Vec<TokenWithPrice>,          // Last successful batch
    pub last_updated: Option<DateTime<Utc>>,  // Time of the last successful batch
    pub last_error: Option<RefreshFailure>,   // Set when the latest cycle failed
    pub attempt: u32,                         // Attempt number within the current cycle
}
