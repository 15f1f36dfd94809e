use serde::{Deserialize, Serialize};
use std::fmt;

use super::token::TokenIdentifier;

/// Which lookup stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStage {
    Metadata,
    Price,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Metadata => write!(f, "metadata"),
            Self::Price => write!(f, "price"),
        }
    }
}

/// Stable error kinds exposed to callers of the inbound interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidRequest,
    InvalidMetadataResponse,
    InvalidPriceResponse,
    UpstreamFailure,
}

/// Failure of the provider call itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid JSON: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceError {
    #[error(
        "Invalid token identifier (chainId: {:?}, symbol: {:?}): {reason}",
        .token.chain_id,
        .token.symbol
    )]
    InvalidRequest {
        token: TokenIdentifier,
        reason: String,
    },

    #[error("Invalid token metadata response for {token}: {reason}")]
    InvalidMetadataResponse {
        token: TokenIdentifier,
        reason: String,
    },

    #[error("Invalid price data response for {token}: {reason}")]
    InvalidPriceResponse {
        token: TokenIdentifier,
        reason: String,
    },

    #[error("Failed to fetch token {stage} for {token}: {source}")]
    UpstreamFailure {
        token: TokenIdentifier,
        stage: LookupStage,
        #[source]
        source: ProviderError,
    },
}

impl PriceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::InvalidMetadataResponse { .. } => ErrorKind::InvalidMetadataResponse,
            Self::InvalidPriceResponse { .. } => ErrorKind::InvalidPriceResponse,
            Self::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
        }
    }

    pub fn token(&self) -> Option<&TokenIdentifier> {
        match self {
            Self::InvalidRequest { token, .. }
            | Self::InvalidMetadataResponse { token, .. }
            | Self::InvalidPriceResponse { token, .. }
            | Self::UpstreamFailure { token, .. } => Some(token),
        }
    }

    pub fn stage(&self) -> Option<LookupStage> {
        match self {
            // Identifiers are checked before the metadata lookup
            Self::InvalidRequest { .. } | Self::InvalidMetadataResponse { .. } => {
                Some(LookupStage::Metadata)
            }
            Self::InvalidPriceResponse { .. } => Some(LookupStage::Price),
            Self::UpstreamFailure { stage, .. } => Some(*stage),
        }
    }

    /// Transient provider failures are worth another attempt, bad data is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_failure_message_names_token_and_stage() {
        let err = PriceError::UpstreamFailure {
            token: TokenIdentifier::new("137", "USDT"),
            stage: LookupStage::Metadata,
            source: ProviderError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            },
        };

        assert_eq!(
            err.to_string(),
            "Failed to fetch token metadata for USDT on chain 137: provider responded with status 502: bad gateway"
        );
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(err.stage(), Some(LookupStage::Metadata));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_errors_are_permanent() {
        let err = PriceError::InvalidPriceResponse {
            token: TokenIdentifier::new("1", "WBTC"),
            reason: "unitPrice must be greater than zero".to_string(),
        };

        assert!(!err.is_retryable());
        assert_eq!(err.token(), Some(&TokenIdentifier::new("1", "WBTC")));
        assert_eq!(err.stage(), Some(LookupStage::Price));
    }

    #[test]
    fn test_invalid_request_names_its_identifier() {
        let token = TokenIdentifier::new("137", " ");
        let err = PriceError::InvalidRequest {
            token: token.clone(),
            reason: "chainId and symbol must be non-empty".to_string(),
        };

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.token(), Some(&token));
        assert_eq!(err.stage(), Some(LookupStage::Metadata));
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Invalid token identifier (chainId: \"137\", symbol: \" \"): chainId and symbol must be non-empty"
        );
    }

    #[test]
    fn test_error_kind_wire_names() {
        let json = serde_json::to_value(ErrorKind::InvalidMetadataResponse).unwrap();
        assert_eq!(json, "INVALID_METADATA_RESPONSE");
    }
}
