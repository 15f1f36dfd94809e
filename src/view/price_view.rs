use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::time::Duration;

use crate::entity::{SupportedToken, SwapQuote, TokenWithPrice};
use crate::utils::{format_token_amount, format_usd};

/// Default display precision when a token's decimals are unknown
pub const DEFAULT_TOKEN_DECIMALS: u8 = 8;

#[async_trait]
pub trait PriceView: Send + Sync {
    async fn display_loading(&self, message: &str) -> Result<()>;
    async fn display_tokens(&self, tokens: &[SupportedToken]) -> Result<()>;
    async fn display_prices(&self, tokens: &[TokenWithPrice]) -> Result<()>;
    async fn display_swap(&self, quote: &SwapQuote, source_decimals: u8, target_decimals: u8) -> Result<()>;
    async fn display_last_updated(&self, seconds_ago: Option<i64>, interval: Duration) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
    async fn display_text(&self, text: &str) -> Result<()>;
}

pub fn price_line(data: &TokenWithPrice) -> String {
    format!(
        "{:<6} chain {:<6} {:>14}  ({})",
        data.symbol,
        data.chain_id,
        format_usd(data.price_info.unit_price),
        data.token_info.name
    )
}

pub fn swap_lines(quote: &SwapQuote, source_decimals: u8, target_decimals: u8) -> Vec<String> {
    let amount = |value: Option<f64>, decimals: u8| match value {
        Some(value) => format_token_amount(value, decimals),
        None => "0.00".to_string(),
    };

    let mut lines = vec![
        format!(
            "{} = {} {}",
            format_usd(quote.usd_amount),
            amount(quote.source_amount, source_decimals),
            quote.source.symbol
        ),
        format!(
            "{} = {} {}",
            format_usd(quote.usd_amount),
            amount(quote.target_amount, target_decimals),
            quote.target.symbol
        ),
    ];

    if let Some(ratio) = quote.ratio {
        lines.push(format!(
            "1 {} = {} {}",
            quote.source.symbol,
            format_token_amount(ratio, 6),
            quote.target.symbol
        ));
    }

    lines
}

pub fn last_updated_line(seconds_ago: Option<i64>, interval: Duration) -> String {
    let ago = match seconds_ago {
        None => "never".to_string(),
        Some(0) => "just now".to_string(),
        Some(seconds) => format!("{}s ago", seconds),
    };

    format!(
        "Last updated: {} (data refreshes every {} seconds)",
        ago,
        interval.as_secs()
    )
}

/// Writes to standard output
pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self
    }

    fn write_lines<I, S>(&self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            writeln!(out, "{}", line.as_ref())?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceView for ConsoleView {
    async fn display_loading(&self, message: &str) -> Result<()> {
        self.write_lines([format!("{}...", message)])
    }

    async fn display_tokens(&self, tokens: &[SupportedToken]) -> Result<()> {
        self.write_lines(tokens.iter().map(|token| {
            format!(
                "{:<6} {:<14} chain {:<6} {}",
                token.symbol, token.name, token.chain_id, token.chain_name
            )
        }))
    }

    async fn display_prices(&self, tokens: &[TokenWithPrice]) -> Result<()> {
        self.write_lines(tokens.iter().map(price_line))
    }

    async fn display_swap(&self, quote: &SwapQuote, source_decimals: u8, target_decimals: u8) -> Result<()> {
        self.write_lines(swap_lines(quote, source_decimals, target_decimals))
    }

    async fn display_last_updated(&self, seconds_ago: Option<i64>, interval: Duration) -> Result<()> {
        self.write_lines([last_updated_line(seconds_ago, interval)])
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.write_lines([format!("❌ {}", error_message)])
    }

    async fn display_text(&self, text: &str) -> Result<()> {
        self.write_lines(text.lines())
    }
}
