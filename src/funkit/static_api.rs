use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::entity::ProviderError;
use crate::funkit::asset_api::AssetApi;

/// In-memory asset API for tests and offline runs.
///
/// Metadata is keyed by `(chain_id, SYMBOL)` and prices by
/// `(chain_id, lowercase address)`. Unknown keys answer with a 404.
pub struct StaticAssetApi {
    metadata: HashMap<(String, String), Result<Value, ProviderError>>,
    prices: HashMap<(String, String), Result<Value, ProviderError>>,
    delay: Option<Duration>,
    metadata_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl StaticAssetApi {
    pub fn new() -> Self {
        Self {
            metadata: HashMap::new(),
            prices: HashMap::new(),
            delay: None,
            metadata_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn metadata_key(chain_id: &str, symbol: &str) -> (String, String) {
        (chain_id.to_string(), symbol.to_uppercase())
    }

    fn price_key(chain_id: &str, address: &str) -> (String, String) {
        (chain_id.to_string(), address.to_lowercase())
    }

    /// Register a well-formed token with its metadata and price.
    pub fn add_token(
        &mut self,
        chain_id: &str,
        symbol: &str,
        address: &str,
        decimals: u8,
        unit_price: f64,
    ) {
        self.set_metadata(
            chain_id,
            symbol,
            json!({
                "address": address,
                "chain": chain_id,
                "decimals": decimals,
                "name": symbol,
                "symbol": symbol,
            }),
        );
        self.set_price(
            chain_id,
            address,
            json!({ "unitPrice": unit_price, "amount": 1, "total": unit_price }),
        );
    }

    pub fn set_metadata(&mut self, chain_id: &str, symbol: &str, payload: Value) {
        self.metadata
            .insert(Self::metadata_key(chain_id, symbol), Ok(payload));
    }

    pub fn set_metadata_error(&mut self, chain_id: &str, symbol: &str, error: ProviderError) {
        self.metadata
            .insert(Self::metadata_key(chain_id, symbol), Err(error));
    }

    pub fn set_price(&mut self, chain_id: &str, address: &str, payload: Value) {
        self.prices
            .insert(Self::price_key(chain_id, address), Ok(payload));
    }

    pub fn set_price_error(&mut self, chain_id: &str, address: &str, error: ProviderError) {
        self.prices.insert(Self::price_key(chain_id, address), Err(error));
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn not_found() -> ProviderError {
        ProviderError::Status {
            status: 404,
            body: "asset not found".to_string(),
        }
    }
}

impl Default for StaticAssetApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetApi for StaticAssetApi {
    async fn get_erc20_by_chain_and_symbol(
        &self,
        chain_id: &str,
        symbol: &str,
    ) -> Result<Value, ProviderError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.metadata
            .get(&Self::metadata_key(chain_id, symbol))
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found()))
    }

    async fn get_price_info(
        &self,
        chain_id: &str,
        token_address: &str,
    ) -> Result<Value, ProviderError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.prices
            .get(&Self::price_key(chain_id, token_address))
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found()))
    }
}
