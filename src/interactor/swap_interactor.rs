use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::entity::{SwapQuote, TokenIdentifier, TokenWithPrice};
use crate::services::RefreshController;
use crate::utils::{swap_ratio, token_amount_for_usd};

/// USD-equivalent comparison of two tokens using the latest refreshed prices
pub trait SwapInteractor: Send + Sync {
    fn quote(
        &self,
        usd_amount: f64,
        source: &TokenIdentifier,
        target: &TokenIdentifier,
    ) -> Result<SwapQuote>;
}

pub struct SwapInteractorImpl {
    controller: Arc<RefreshController>,
}

impl SwapInteractorImpl {
    pub fn new(controller: Arc<RefreshController>) -> Self {
        Self { controller }
    }
}

/// Builds a quote from two priced tokens. Missing amounts or ratio mean the
/// inputs could not produce a meaningful number.
pub fn build_quote(usd_amount: f64, source: &TokenWithPrice, target: &TokenWithPrice) -> SwapQuote {
    let source_price = source.price_info.unit_price;
    let target_price = target.price_info.unit_price;

    SwapQuote {
        usd_amount,
        source: TokenIdentifier::new(source.chain_id.clone(), source.symbol.clone()),
        target: TokenIdentifier::new(target.chain_id.clone(), target.symbol.clone()),
        source_amount: token_amount_for_usd(usd_amount, source_price),
        target_amount: token_amount_for_usd(usd_amount, target_price),
        ratio: swap_ratio(source_price, target_price),
    }
}

impl SwapInteractor for SwapInteractorImpl {
    fn quote(
        &self,
        usd_amount: f64,
        source: &TokenIdentifier,
        target: &TokenIdentifier,
    ) -> Result<SwapQuote> {
        let snapshot = self.controller.snapshot();
        let find = |token: &TokenIdentifier| {
            snapshot
                .tokens
                .iter()
                .find(|data| data.matches(token))
                .ok_or_else(|| anyhow!("No price data for {} yet", token))
        };

        let source_data = find(source)?;
        let target_data = find(target)?;

        Ok(build_quote(usd_amount, source_data, target_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{TokenMetadata, TokenPrice};
    use crate::funkit::StaticAssetApi;
    use crate::services::{RefreshConfig, TokenAggregationService};

    fn priced(chain_id: &str, symbol: &str, unit_price: f64) -> TokenWithPrice {
        TokenWithPrice::new(
            &TokenIdentifier::new(chain_id, symbol),
            TokenMetadata {
                address: format!("0x{}", symbol.to_lowercase()),
                chain: chain_id.to_string(),
                decimals: 18,
                name: symbol.to_string(),
                symbol: symbol.to_string(),
            },
            TokenPrice {
                unit_price,
                amount: 1.0,
                total: unit_price,
            },
        )
    }

    #[test]
    fn test_build_quote() {
        let quote = build_quote(100.0, &priced("8453", "ETH", 3200.0), &priced("1", "USDC", 1.0));

        assert_eq!(quote.source_amount, Some(0.03125));
        assert_eq!(quote.target_amount, Some(100.0));
        assert_eq!(quote.ratio, Some(3200.0));
    }

    #[test]
    fn test_build_quote_with_zero_usd() {
        let quote = build_quote(0.0, &priced("1", "USDC", 1.0), &priced("137", "USDT", 1.0));

        assert_eq!(quote.source_amount, None);
        assert_eq!(quote.target_amount, None);
        assert_eq!(quote.ratio, Some(1.0));
    }

    #[tokio::test]
    async fn test_quote_uses_refreshed_prices() {
        let mut api = StaticAssetApi::new();
        api.add_token("1", "USDC", "0xa0b8", 6, 1.0002);
        api.add_token("137", "USDT", "0xc213", 6, 0.9998);
        let controller = Arc::new(RefreshController::new(
            Arc::new(TokenAggregationService::with_api(Arc::new(api))),
            vec![TokenIdentifier::new("1", "USDC"), TokenIdentifier::new("137", "USDT")],
            RefreshConfig::default(),
        ));
        let interactor = SwapInteractorImpl::new(controller.clone());
        let usdc = TokenIdentifier::new("1", "USDC");
        let usdt = TokenIdentifier::new("137", "USDT");

        assert!(interactor.quote(100.0, &usdc, &usdt).is_err());

        controller.refresh().await.unwrap();
        let quote = interactor.quote(100.0, &usdc, &usdt).unwrap();

        let ratio = quote.ratio.unwrap();
        assert!((ratio - 1.0002 / 0.9998).abs() < 1e-12);
        assert_eq!(quote.source, usdc);
    }
}
