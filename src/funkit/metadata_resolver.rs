use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;

use crate::entity::{LookupStage, PriceError, TokenIdentifier, TokenMetadata};
use crate::funkit::asset_api::AssetApi;
use crate::funkit::models::validate_metadata;

/// Resolves a (chain, symbol) pair into on-chain token metadata
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// One provider call per invocation, no caching and no retries
    async fn resolve_metadata(&self, token: &TokenIdentifier) -> Result<TokenMetadata, PriceError>;
}

pub struct FunkitMetadataResolver {
    api: Arc<dyn AssetApi>,
}

impl FunkitMetadataResolver {
    pub fn new(api: Arc<dyn AssetApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MetadataResolver for FunkitMetadataResolver {
    async fn resolve_metadata(&self, token: &TokenIdentifier) -> Result<TokenMetadata, PriceError> {
        if !token.is_well_formed() {
            return Err(PriceError::InvalidRequest {
                token: token.clone(),
                reason: "chainId and symbol must be non-empty".to_string(),
            });
        }

        debug!("Resolving metadata for {}", token);

        let payload = self
            .api
            .get_erc20_by_chain_and_symbol(&token.chain_id, &token.symbol)
            .await
            .map_err(|source| {
                error!("Error fetching metadata for {}: {}", token, source);
                PriceError::UpstreamFailure {
                    token: token.clone(),
                    stage: LookupStage::Metadata,
                    source,
                }
            })?;

        validate_metadata(token, payload)
    }
}
