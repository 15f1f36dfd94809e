// src/funkit/asset_api.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::entity::ProviderError;
use crate::funkit::Config;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Outbound asset API. Responses are untyped JSON and must be validated by the caller.
#[async_trait]
pub trait AssetApi: Send + Sync {
    /// Fetch ERC-20 metadata by chain and symbol
    async fn get_erc20_by_chain_and_symbol(
        &self,
        chain_id: &str,
        symbol: &str,
    ) -> Result<Value, ProviderError>;

    /// Fetch price info by chain and token address
    async fn get_price_info(
        &self,
        chain_id: &str,
        token_address: &str,
    ) -> Result<Value, ProviderError>;
}

/// Asset API client for the Funkit HTTP API
pub struct FunkitAssetApi {
    http_client: Client,
    base_url: Url,
    config: Config,
}

impl FunkitAssetApi {
    /// Fails on a malformed base URL, so a bad configuration stops startup
    /// instead of surfacing as a provider error on every call.
    pub fn new(config: Config) -> Result<Self> {
        let base_url = Url::parse(config.base_url())
            .with_context(|| format!("Invalid asset API URL: {}", config.api_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Asset API URL cannot be a base: {}", config.api_url));
        }

        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client for the asset API")?;

        Ok(Self {
            http_client,
            base_url,
            config,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value, ProviderError> {
        let response = self
            .http_client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach asset API at {}: {}", url, e);
                ProviderError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!("Asset API response: {} for {}", status, url);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Asset API error [{}]: {}", url.path(), body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Body(e.to_string()))
    }
}

#[async_trait]
impl AssetApi for FunkitAssetApi {
    async fn get_erc20_by_chain_and_symbol(
        &self,
        chain_id: &str,
        symbol: &str,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(&["asset", "erc20", chain_id, symbol]);
        self.get_json(url).await
    }

    async fn get_price_info(
        &self,
        chain_id: &str,
        token_address: &str,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(&["asset", "erc20", "price", chain_id, token_address]);
        self.get_json(url).await
    }
}
