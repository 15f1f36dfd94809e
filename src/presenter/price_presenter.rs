use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::sync::Arc;

use crate::entity::{RefreshPhase, TokenIdentifier};
use crate::interactor::{SwapInteractor, TokenInteractor};
use crate::services::RefreshController;
use crate::view::price_view::{PriceView, DEFAULT_TOKEN_DECIMALS};

#[async_trait]
pub trait PricePresenter: Send + Sync {
    async fn show_supported_tokens(&self) -> Result<()>;
    async fn show_token_price(&self, token: TokenIdentifier) -> Result<()>;
    async fn show_prices(&self) -> Result<()>;
    async fn refresh_prices(&self) -> Result<()>;
    async fn show_swap(&self, usd_amount: f64, source: &TokenIdentifier, target: &TokenIdentifier) -> Result<()>;
    async fn show_status(&self) -> Result<()>;
    async fn show_error(&self, message: String) -> Result<()>;
    async fn show_text(&self, text: &str) -> Result<()>;
}

pub struct PricePresenterImpl<V> {
    token_interactor: Arc<dyn TokenInteractor>,
    swap_interactor: Arc<dyn SwapInteractor>,
    controller: Arc<RefreshController>,
    view: Arc<V>,
}

impl<V> PricePresenterImpl<V>
where
    V: PriceView,
{
    pub fn new(
        token_interactor: Arc<dyn TokenInteractor>,
        swap_interactor: Arc<dyn SwapInteractor>,
        controller: Arc<RefreshController>,
        view: Arc<V>,
    ) -> Self {
        Self {
            token_interactor,
            swap_interactor,
            controller,
            view,
        }
    }

    fn decimals_of(&self, token: &TokenIdentifier) -> u8 {
        self.controller
            .snapshot()
            .tokens
            .iter()
            .find(|data| data.matches(token))
            .map(|data| data.token_info.decimals)
            .unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }
}

#[async_trait]
impl<V> PricePresenter for PricePresenterImpl<V>
where
    V: PriceView + Send + Sync,
{
    async fn show_supported_tokens(&self) -> Result<()> {
        let tokens = self.token_interactor.get_supported_tokens();
        self.view.display_tokens(&tokens).await
    }

    async fn show_token_price(&self, token: TokenIdentifier) -> Result<()> {
        self.view
            .display_loading(&format!("Getting price for {}", token))
            .await?;

        match self.token_interactor.get_token_data(token).await {
            Ok(data) => self.view.display_prices(std::slice::from_ref(&data)).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn show_prices(&self) -> Result<()> {
        let snapshot = self.controller.snapshot();

        if snapshot.tokens.is_empty() {
            self.view.display_text("No prices loaded yet").await?;
        } else {
            self.view.display_prices(&snapshot.tokens).await?;
        }

        if let Some(failure) = snapshot.last_error {
            self.view
                .display_error(format!("Failed to load token data: {}", failure.message))
                .await?;
        }

        self.view
            .display_last_updated(
                self.controller.seconds_since_update(Utc::now()),
                self.controller.config().interval,
            )
            .await
    }

    async fn refresh_prices(&self) -> Result<()> {
        self.view.display_loading("Refreshing prices").await?;

        // Outcome is published through the controller's snapshot
        if let Err(e) = self.controller.refresh().await {
            debug!("Manual refresh failed: {}", e);
        }
        Ok(())
    }

    async fn show_swap(&self, usd_amount: f64, source: &TokenIdentifier, target: &TokenIdentifier) -> Result<()> {
        match self.swap_interactor.quote(usd_amount, source, target) {
            Ok(quote) => {
                self.view
                    .display_swap(&quote, self.decimals_of(source), self.decimals_of(target))
                    .await
            }
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn show_status(&self) -> Result<()> {
        let snapshot = self.controller.snapshot();
        let phase = match snapshot.phase {
            RefreshPhase::Idle => "idle".to_string(),
            RefreshPhase::Fetching => format!("fetching (attempt {})", snapshot.attempt + 1),
            RefreshPhase::Error => "error".to_string(),
        };

        self.view
            .display_text(&format!(
                "Refresh status: {}, {} tokens tracked",
                phase,
                self.controller.tokens().len()
            ))
            .await?;

        if let Some(failure) = snapshot.last_error {
            let hint = if failure.retryable {
                "will retry on the next cycle"
            } else {
                "data problem"
            };
            self.view
                .display_error(format!("{} ({})", failure.message, hint))
                .await?;
        }

        self.view
            .display_last_updated(
                self.controller.seconds_since_update(Utc::now()),
                self.controller.config().interval,
            )
            .await
    }

    async fn show_error(&self, message: String) -> Result<()> {
        self.view.display_error(message).await
    }

    async fn show_text(&self, text: &str) -> Result<()> {
        self.view.display_text(text).await
    }
}
