use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;

use crate::entity::{LookupStage, PriceError, TokenIdentifier, TokenPrice};
use crate::funkit::asset_api::AssetApi;
use crate::funkit::models::validate_price;

/// Resolves the current USD unit price of a token by its address
#[async_trait]
pub trait PriceResolver: Send + Sync {
    /// Price for `token_address` on `token.chain_id`; `token` names the lookup in errors
    async fn resolve_price(
        &self,
        token: &TokenIdentifier,
        token_address: &str,
    ) -> Result<TokenPrice, PriceError>;
}

pub struct FunkitPriceResolver {
    api: Arc<dyn AssetApi>,
}

impl FunkitPriceResolver {
    pub fn new(api: Arc<dyn AssetApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PriceResolver for FunkitPriceResolver {
    async fn resolve_price(
        &self,
        token: &TokenIdentifier,
        token_address: &str,
    ) -> Result<TokenPrice, PriceError> {
        debug!("Resolving price for {} ({})", token, token_address);

        let payload = self
            .api
            .get_price_info(&token.chain_id, token_address)
            .await
            .map_err(|source| {
                error!("Error fetching price for {}: {}", token, source);
                PriceError::UpstreamFailure {
                    token: token.clone(),
                    stage: LookupStage::Price,
                    source,
                }
            })?;

        validate_price(token, payload)
    }
}
