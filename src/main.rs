//! Token Price Explorer - Main executable
//!
//! Console front end that keeps live USD prices for a fixed set of ERC-20
//! tokens and lets the user compare how much of each token a dollar amount buys.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

use token_price_explorer::commands::{self, help::HelpCommand};
use token_price_explorer::{
    AppConfig, ConsoleView, PricePresenter, PricePresenterImpl, RefreshPhase, RefreshService,
    ServiceContainer,
};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Token Price Explorer v{}", token_price_explorer::VERSION);

    // Load and validate configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Using asset API at {} (refresh every {}s)",
        config.funkit.base_url(),
        config.refresh.interval.as_secs()
    );

    let services = ServiceContainer::new(config).context("Failed to initialize services")?;

    let presenter: Arc<dyn PricePresenter> = Arc::new(PricePresenterImpl::new(
        services.token_interactor(),
        services.swap_interactor(),
        services.refresh_controller(),
        Arc::new(ConsoleView::new()),
    ));

    // Print the board whenever a refresh cycle settles
    let mut updates = services.refresh_controller().subscribe();
    let board_presenter = presenter.clone();
    let board = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let phase = updates.borrow_and_update().phase;
            let shown = match phase {
                RefreshPhase::Idle => board_presenter.show_prices().await,
                RefreshPhase::Error => board_presenter.show_status().await,
                RefreshPhase::Fetching => Ok(()),
            };
            if let Err(e) = shown {
                error!("Failed to display prices: {}", e);
            }
        }
    });

    // Start background refresh
    info!("Starting price refresh service...");
    let mut refresh_service = RefreshService::new(services.refresh_controller());
    refresh_service
        .start()
        .context("Failed to start price refresh service")?;

    presenter.show_text(&HelpCommand::help_text()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                match commands::dispatch(&line, presenter.as_ref()).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        error!("Command failed: {}", e);
                        presenter.show_error(e.to_string()).await?;
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C");
                break;
            }
        }
    }

    // Stop refresh service
    info!("Stopping price refresh service...");
    refresh_service.stop().await;
    board.abort();

    Ok(())
}
