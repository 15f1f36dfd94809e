use super::{register_commands, CommandHandler};
use crate::presenter::PricePresenter;
use anyhow::Result;

pub struct HelpCommand;

impl HelpCommand {
    pub fn help_text() -> String {
        let mut text = String::from("Available commands:\n");
        for (name, description) in register_commands() {
            text.push_str(&format!("  {:<8} {}\n", name, description));
        }
        text
    }
}

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(_args: &str, presenter: &dyn PricePresenter) -> Result<()> {
        presenter.show_text(&Self::help_text()).await
    }
}
