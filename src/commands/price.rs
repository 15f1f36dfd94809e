use super::CommandHandler;
use crate::catalog;
use crate::entity::TokenIdentifier;
use crate::presenter::PricePresenter;
use anyhow::Result;
use log::info;

pub struct TokensCommand;
pub struct PricesCommand;
pub struct PriceCommand;
pub struct RefreshCommand;
pub struct StatusCommand;

impl CommandHandler for TokensCommand {
    fn command_name() -> &'static str {
        "tokens"
    }

    fn description() -> &'static str {
        "list supported tokens"
    }

    async fn execute(_args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        presenter.show_supported_tokens().await
    }
}

impl CommandHandler for PricesCommand {
    fn command_name() -> &'static str {
        "prices"
    }

    fn description() -> &'static str {
        "show the latest refreshed prices"
    }

    async fn execute(_args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        presenter.show_prices().await
    }
}

impl PriceCommand {
    /// Accepts `<chainId> <symbol>`, or a bare `<symbol>` from the catalog
    pub fn parse_token(args: &str) -> Option<TokenIdentifier> {
        let parts: Vec<&str> = args.split_whitespace().collect();

        match parts.as_slice() {
            [chain_id, symbol] => Some(TokenIdentifier::new(*chain_id, symbol.to_uppercase())),
            [symbol] => catalog::find_by_symbol(symbol).map(|token| token.identifier()),
            _ => None,
        }
    }
}

impl CommandHandler for PriceCommand {
    fn command_name() -> &'static str {
        "price"
    }

    fn description() -> &'static str {
        "<chainId> <symbol>: fetch a live price for one token"
    }

    async fn execute(args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        match Self::parse_token(args) {
            Some(token) => {
                info!("Price command received for token: {}", token);
                presenter.show_token_price(token).await
            }
            None => {
                presenter
                    .show_text(
                        "Use the command in this format: price <chainId> <symbol>\n\nExample: price 1 USDC",
                    )
                    .await
            }
        }
    }
}

impl CommandHandler for RefreshCommand {
    fn command_name() -> &'static str {
        "refresh"
    }

    fn description() -> &'static str {
        "refresh all prices now"
    }

    async fn execute(_args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        presenter.refresh_prices().await
    }
}

impl CommandHandler for StatusCommand {
    fn command_name() -> &'static str {
        "status"
    }

    fn description() -> &'static str {
        "show refresh status and last error"
    }

    async fn execute(_args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        presenter.show_status().await
    }
}
