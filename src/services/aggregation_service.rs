use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::entity::{PriceError, TokenIdentifier, TokenMetadata, TokenWithPrice};
use crate::funkit::{
    AssetApi, FunkitMetadataResolver, FunkitPriceResolver, MetadataResolver, PriceResolver,
};

/// Combines metadata and price lookups into single and batch operations
#[async_trait]
pub trait AggregationService: Send + Sync {
    /// Metadata then price for one token; the first failure aborts
    async fn get_one(&self, token: &TokenIdentifier) -> Result<TokenWithPrice, PriceError>;

    /// All tokens or an error: results keep the input order and length
    async fn get_many(&self, tokens: &[TokenIdentifier]) -> Result<Vec<TokenWithPrice>, PriceError>;
}

pub struct TokenAggregationService {
    metadata_resolver: Arc<dyn MetadataResolver>,
    price_resolver: Arc<dyn PriceResolver>,
}

impl TokenAggregationService {
    pub fn new(
        metadata_resolver: Arc<dyn MetadataResolver>,
        price_resolver: Arc<dyn PriceResolver>,
    ) -> Self {
        Self {
            metadata_resolver,
            price_resolver,
        }
    }

    /// Both resolvers backed by the same asset API
    pub fn with_api(api: Arc<dyn AssetApi>) -> Self {
        Self::new(
            Arc::new(FunkitMetadataResolver::new(api.clone())),
            Arc::new(FunkitPriceResolver::new(api)),
        )
    }

    async fn price_for(
        &self,
        token: &TokenIdentifier,
        metadata: TokenMetadata,
    ) -> Result<TokenWithPrice, PriceError> {
        let price = self
            .price_resolver
            .resolve_price(token, &metadata.address)
            .await?;

        Ok(TokenWithPrice::new(token, metadata, price))
    }
}

#[async_trait]
impl AggregationService for TokenAggregationService {
    async fn get_one(&self, token: &TokenIdentifier) -> Result<TokenWithPrice, PriceError> {
        let metadata = self.metadata_resolver.resolve_metadata(token).await?;
        self.price_for(token, metadata).await
    }

    async fn get_many(&self, tokens: &[TokenIdentifier]) -> Result<Vec<TokenWithPrice>, PriceError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        info!("Fetching token data for {} tokens", tokens.len());

        // Stage 1: metadata for every token; one bad token fails the batch
        let metadata = join_all(
            tokens
                .iter()
                .map(|token| self.metadata_resolver.resolve_metadata(token)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            warn!("Batch aborted at metadata stage: {}", e);
            e
        })?;

        debug!("Resolved metadata for {} tokens", metadata.len());

        // Stage 2: prices by resolved address
        let results = join_all(
            tokens
                .iter()
                .zip(metadata)
                .map(|(token, metadata)| self.price_for(token, metadata)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            warn!("Batch aborted at price stage: {}", e);
            e
        })?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ErrorKind, LookupStage, ProviderError};
    use crate::funkit::StaticAssetApi;
    use serde_json::json;
    use std::time::Duration;

    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const USDT: &str = "0xc2132d05d31c914a87c6611c10748aeb04b58e8f";
    const WETH: &str = "0x4200000000000000000000000000000000000006";

    fn market() -> StaticAssetApi {
        let mut api = StaticAssetApi::new();
        api.add_token("1", "USDC", USDC, 6, 1.0002);
        api.add_token("137", "USDT", USDT, 6, 0.9998);
        api.add_token("8453", "ETH", WETH, 18, 3120.75);
        api
    }

    fn ids() -> Vec<TokenIdentifier> {
        vec![
            TokenIdentifier::new("1", "USDC"),
            TokenIdentifier::new("137", "USDT"),
        ]
    }

    #[tokio::test]
    async fn test_get_one_echoes_identifier() {
        let service = TokenAggregationService::with_api(Arc::new(market()));
        let token = TokenIdentifier::new("8453", "ETH");

        let data = service.get_one(&token).await.unwrap();

        assert_eq!(data.chain_id, "8453");
        assert_eq!(data.symbol, "ETH");
        assert_eq!(data.token_info.address, WETH);
        assert!(data.price_info.unit_price > 0.0);
    }

    #[tokio::test]
    async fn test_get_one_is_stable_without_upstream_change() {
        let service = TokenAggregationService::with_api(Arc::new(market()));
        let token = TokenIdentifier::new("1", "USDC");

        let first = service.get_one(&token).await.unwrap();
        let second = service.get_one(&token).await.unwrap();

        assert_eq!(first.token_info, second.token_info);
        assert_eq!(first.price_info.unit_price, second.price_info.unit_price);
    }

    #[tokio::test]
    async fn test_get_one_tags_price_stage() {
        let mut api = market();
        api.set_price("1", USDC, json!({ "unitPrice": -3 }));
        let service = TokenAggregationService::with_api(Arc::new(api));

        let err = service
            .get_one(&TokenIdentifier::new("1", "USDC"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidPriceResponse);
        assert_eq!(err.stage(), Some(LookupStage::Price));
    }

    #[tokio::test]
    async fn test_get_many_keeps_order() {
        let service = TokenAggregationService::with_api(Arc::new(market()));

        let data = service.get_many(&ids()).await.unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].symbol, "USDC");
        assert_eq!(data[0].price_info.unit_price, 1.0002);
        assert_eq!(data[1].symbol, "USDT");
        assert_eq!(data[1].chain_id, "137");
        assert_eq!(data[1].price_info.unit_price, 0.9998);
    }

    #[tokio::test]
    async fn test_get_many_reversed_input_reverses_output() {
        let service = TokenAggregationService::with_api(Arc::new(market()));
        let mut tokens = ids();
        tokens.push(TokenIdentifier::new("8453", "ETH"));
        tokens.reverse();

        let data = service.get_many(&tokens).await.unwrap();

        let symbols: Vec<_> = data.iter().map(|d| d.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "USDT", "USDC"]);
    }

    #[tokio::test]
    async fn test_get_many_empty_batch() {
        let api = Arc::new(market());
        let service = TokenAggregationService::with_api(api.clone());

        assert!(service.get_many(&[]).await.unwrap().is_empty());
        assert_eq!(api.metadata_calls(), 0);
        assert_eq!(api.price_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_many_metadata_failure_fails_batch() {
        let mut api = market();
        api.set_metadata_error("137", "USDT", ProviderError::Transport("connection reset".to_string()));
        let api = Arc::new(api);
        let service = TokenAggregationService::with_api(api.clone());

        let err = service.get_many(&ids()).await.unwrap_err();

        assert_eq!(err.token(), Some(&TokenIdentifier::new("137", "USDT")));
        assert_eq!(err.stage(), Some(LookupStage::Metadata));
        assert_eq!(api.price_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_many_blank_identifier_names_entry() {
        let api = Arc::new(market());
        let service = TokenAggregationService::with_api(api.clone());
        let blank = TokenIdentifier::new("137", "");

        let err = service
            .get_many(&[TokenIdentifier::new("1", "USDC"), blank.clone()])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.token(), Some(&blank));
        assert_eq!(api.price_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_many_malformed_metadata_fails_batch() {
        let mut api = market();
        api.set_metadata("1", "USDC", json!({ "error": "token not found" }));
        let service = TokenAggregationService::with_api(Arc::new(api));

        let err = service.get_many(&ids()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidMetadataResponse);
        assert_eq!(err.token(), Some(&TokenIdentifier::new("1", "USDC")));
    }

    #[tokio::test]
    async fn test_get_many_price_failure_names_token() {
        let mut api = market();
        api.set_price("137", USDT, json!({ "unitPrice": 0 }));
        let service = TokenAggregationService::with_api(Arc::new(api));

        let err = service.get_many(&ids()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidPriceResponse);
        assert_eq!(err.token(), Some(&TokenIdentifier::new("137", "USDT")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_many_fans_out_concurrently() {
        let mut api = market();
        api.add_token("1", "WBTC", "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599", 8, 64000.0);
        let api = Arc::new(api.with_delay(Duration::from_millis(500)));
        let service = TokenAggregationService::with_api(api.clone());
        let mut tokens = ids();
        tokens.push(TokenIdentifier::new("8453", "ETH"));
        tokens.push(TokenIdentifier::new("1", "WBTC"));

        let started = tokio::time::Instant::now();
        let data = service.get_many(&tokens).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(data.len(), 4);
        assert_eq!(api.metadata_calls(), 4);
        assert_eq!(api.price_calls(), 4);
        // One delay per stage, not one per call
        assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
    }
}
