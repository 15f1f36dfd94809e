use anyhow::{Context, Result};
use std::sync::Arc;

use crate::catalog;
use crate::config::AppConfig;
use crate::funkit::{AssetApi, FunkitAssetApi};
use crate::interactor::{SwapInteractor, SwapInteractorImpl, TokenInteractor, TokenInteractorImpl};
use crate::services::{AggregationService, RefreshController, TokenAggregationService};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    refresh_controller: Arc<RefreshController>,

    // Inbound
    token_interactor: Arc<dyn TokenInteractor>,
    swap_interactor: Arc<dyn SwapInteractor>,
}

impl ServiceContainer {
    /// Create a container talking to the live Funkit API
    pub fn new(config: AppConfig) -> Result<Self> {
        let asset_api = Arc::new(
            FunkitAssetApi::new(config.funkit.clone()).context("Failed to create Funkit API client")?,
        ) as Arc<dyn AssetApi>;

        Ok(Self::with_asset_api(asset_api, config))
    }

    /// Create a container over any asset API implementation
    pub fn with_asset_api(asset_api: Arc<dyn AssetApi>, config: AppConfig) -> Self {
        let aggregation_service = Arc::new(TokenAggregationService::with_api(asset_api))
            as Arc<dyn AggregationService>;

        // The refresh controller tracks the whole catalog
        let refresh_controller = Arc::new(RefreshController::new(
            aggregation_service.clone(),
            catalog::supported_identifiers(),
            config.refresh,
        ));

        let token_interactor = Arc::new(TokenInteractorImpl::new(aggregation_service))
            as Arc<dyn TokenInteractor>;
        let swap_interactor = Arc::new(SwapInteractorImpl::new(refresh_controller.clone()))
            as Arc<dyn SwapInteractor>;

        Self {
            refresh_controller,
            token_interactor,
            swap_interactor,
        }
    }

    pub fn refresh_controller(&self) -> Arc<RefreshController> {
        self.refresh_controller.clone()
    }

    pub fn token_interactor(&self) -> Arc<dyn TokenInteractor> {
        self.token_interactor.clone()
    }

    pub fn swap_interactor(&self) -> Arc<dyn SwapInteractor> {
        self.swap_interactor.clone()
    }
}
