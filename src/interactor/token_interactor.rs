use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::SUPPORTED_TOKENS;
use crate::entity::{ErrorKind, PriceError, SupportedToken, TokenIdentifier, TokenWithPrice};
use crate::services::AggregationService;

/// Structured error returned by the inbound operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<PriceError> for ApiError {
    fn from(err: PriceError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Inbound request/response operations
#[async_trait]
pub trait TokenInteractor: Send + Sync {
    /// Reads the static catalog only
    fn get_supported_tokens(&self) -> Vec<SupportedToken>;

    async fn get_token_data(&self, token: TokenIdentifier) -> Result<TokenWithPrice, ApiError>;

    /// Order-preserving; any internal failure fails the whole call
    async fn get_multiple_token_data(
        &self,
        tokens: Vec<TokenIdentifier>,
    ) -> Result<Vec<TokenWithPrice>, ApiError>;
}

pub struct TokenInteractorImpl {
    aggregation: Arc<dyn AggregationService>,
}

impl TokenInteractorImpl {
    pub fn new(aggregation: Arc<dyn AggregationService>) -> Self {
        Self { aggregation }
    }
}

#[async_trait]
impl TokenInteractor for TokenInteractorImpl {
    fn get_supported_tokens(&self) -> Vec<SupportedToken> {
        SUPPORTED_TOKENS.clone()
    }

    async fn get_token_data(&self, token: TokenIdentifier) -> Result<TokenWithPrice, ApiError> {
        self.aggregation.get_one(&token).await.map_err(|e| {
            warn!("Error fetching token data for {}: {}", token, e);
            ApiError::from(e)
        })
    }

    async fn get_multiple_token_data(
        &self,
        tokens: Vec<TokenIdentifier>,
    ) -> Result<Vec<TokenWithPrice>, ApiError> {
        self.aggregation.get_many(&tokens).await.map_err(|e| {
            warn!("Error in get_multiple_token_data: {}", e);
            ApiError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funkit::StaticAssetApi;
    use crate::services::TokenAggregationService;
    use serde_json::json;

    fn interactor(api: StaticAssetApi) -> TokenInteractorImpl {
        TokenInteractorImpl::new(Arc::new(TokenAggregationService::with_api(Arc::new(api))))
    }

    #[test]
    fn test_supported_tokens_come_from_catalog() {
        let tokens = interactor(StaticAssetApi::new()).get_supported_tokens();
        assert_eq!(tokens.len(), SUPPORTED_TOKENS.len());
        assert_eq!(tokens[0].symbol, "USDC");
        assert_eq!(tokens[1].chain_name, "Polygon");
    }

    #[tokio::test]
    async fn test_get_token_data() {
        let mut api = StaticAssetApi::new();
        api.add_token("1", "USDC", "0xa0b8", 6, 1.0002);

        let data = interactor(api)
            .get_token_data(TokenIdentifier::new("1", "USDC"))
            .await
            .unwrap();

        assert_eq!(data.symbol, "USDC");
        assert_eq!(data.price_info.unit_price, 1.0002);
    }

    #[tokio::test]
    async fn test_blank_identifier_is_invalid_request() {
        let err = interactor(StaticAssetApi::new())
            .get_token_data(TokenIdentifier::new(" ", "USDC"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn test_errors_are_structured() {
        let mut api = StaticAssetApi::new();
        api.add_token("1", "USDC", "0xa0b8", 6, 1.0002);
        api.set_metadata("137", "USDT", json!({ "address": "0xc213", "symbol": "USDT" }));

        let err = interactor(api)
            .get_multiple_token_data(vec![
                TokenIdentifier::new("1", "USDC"),
                TokenIdentifier::new("137", "USDT"),
            ])
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidMetadataResponse);
        assert!(err.message.contains("USDT on chain 137"));

        let wire = serde_json::to_value(&err).unwrap();
        assert_eq!(wire["kind"], "INVALID_METADATA_RESPONSE");
        assert_eq!(wire["retryable"], false);
    }
}
