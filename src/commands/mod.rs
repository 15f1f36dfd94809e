use anyhow::Result;
use log::info;

use crate::presenter::PricePresenter;

pub mod help;
pub mod price;
pub mod swap;

/// Trait that defines a console command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command with everything typed after its name
    async fn execute(args: &str, presenter: &dyn PricePresenter) -> Result<()>;
}

pub const QUIT_COMMANDS: [&str; 2] = ["quit", "exit"];

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            price::TokensCommand::command_name(),
            price::TokensCommand::description(),
        ),
        (
            price::PricesCommand::command_name(),
            price::PricesCommand::description(),
        ),
        (
            price::PriceCommand::command_name(),
            price::PriceCommand::description(),
        ),
        (
            price::RefreshCommand::command_name(),
            price::RefreshCommand::description(),
        ),
        (
            swap::SwapCommand::command_name(),
            swap::SwapCommand::description(),
        ),
        (
            price::StatusCommand::command_name(),
            price::StatusCommand::description(),
        ),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
        (QUIT_COMMANDS[0], "stop the application"),
    ]
}

/// Runs one input line. Returns `false` once the user asked to quit.
pub async fn dispatch(line: &str, presenter: &dyn PricePresenter) -> Result<bool> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(true);
    }

    let (name, args) = match line.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (line, ""),
    };
    let name = name.trim_start_matches('/').to_lowercase();

    info!("Command received: {}", name);

    match name.as_str() {
        n if QUIT_COMMANDS.contains(&n) => return Ok(false),
        n if n == help::HelpCommand::command_name() => {
            help::HelpCommand::execute(args, presenter).await?
        }
        n if n == price::TokensCommand::command_name() => {
            price::TokensCommand::execute(args, presenter).await?
        }
        n if n == price::PricesCommand::command_name() => {
            price::PricesCommand::execute(args, presenter).await?
        }
        n if n == price::PriceCommand::command_name() => {
            price::PriceCommand::execute(args, presenter).await?
        }
        n if n == price::RefreshCommand::command_name() => {
            price::RefreshCommand::execute(args, presenter).await?
        }
        n if n == price::StatusCommand::command_name() => {
            price::StatusCommand::execute(args, presenter).await?
        }
        n if n == swap::SwapCommand::command_name() => {
            swap::SwapCommand::execute(args, presenter).await?
        }
        other => {
            presenter
                .show_error(format!(
                    "Unknown command: {}. Type help to see available commands",
                    other
                ))
                .await?
        }
    }

    Ok(true)
}
