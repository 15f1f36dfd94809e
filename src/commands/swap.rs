use super::CommandHandler;
use crate::catalog;
use crate::presenter::PricePresenter;
use crate::utils::parse_swap_args;
use anyhow::Result;
use log::info;

pub struct SwapCommand;

impl CommandHandler for SwapCommand {
    fn command_name() -> &'static str {
        "swap"
    }

    fn description() -> &'static str {
        "<usd> <FROM> <TO>: compare how much of two tokens a USD amount buys"
    }

    async fn execute(args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        let Some((usd_amount, from, to)) = parse_swap_args(args) else {
            return presenter
                .show_text("Use the command in this format: swap <usd> <FROM> <TO>\n\nExample: swap 100 USDC ETH")
                .await;
        };

        info!("Swap command received: ${} {} -> {}", usd_amount, from, to);

        let source = match catalog::find_by_symbol(from) {
            Some(token) => token.identifier(),
            None => return presenter.show_error(format!("Unknown token: {}", from)).await,
        };
        let target = match catalog::find_by_symbol(to) {
            Some(token) => token.identifier(),
            None => return presenter.show_error(format!("Unknown token: {}", to)).await,
        };

        presenter.show_swap(usd_amount, &source, &target).await
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::dispatch;
    use crate::commands::tests::RecordingPresenter;

    #[tokio::test]
    async fn test_swap_command_resolves_catalog_tokens() {
        let presenter = RecordingPresenter::default();

        dispatch("swap $250 usdc to eth", &presenter).await.unwrap();

        assert_eq!(
            presenter.calls(),
            vec!["swap 250 USDC on chain 1 ETH on chain 8453"]
        );
    }

    #[tokio::test]
    async fn test_swap_command_rejects_unknown_token() {
        let presenter = RecordingPresenter::default();

        dispatch("swap 10 USDC DOGE", &presenter).await.unwrap();
        dispatch("swap ten USDC ETH", &presenter).await.unwrap();

        let calls = presenter.calls();
        assert_eq!(calls[0], "error Unknown token: DOGE");
        assert!(calls[1].starts_with("text Use the command in this format: swap"));
    }
}
