use anyhow::{anyhow, Context, Result};
use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::funkit::config::{Config as FunkitConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::services::refresh_service::{
    RefreshConfig, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES,
    DEFAULT_REFRESH_INTERVAL,
};

/// Raw settings as read from the environment
#[derive(Debug, Deserialize)]
struct Settings {
    funkit_api_key: Option<String>,
    funkit_api_url: String,
    request_timeout_secs: u64,
    price_refetch_interval_secs: u64,
    refresh_max_retries: u32,
    refresh_base_delay_ms: u64,
    refresh_max_delay_ms: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub funkit: FunkitConfig,
    pub refresh: RefreshConfig,
}

impl AppConfig {
    /// Reads configuration from environment variables, falling back to defaults
    /// for everything except the API key.
    pub fn from_env() -> Result<Self> {
        let builder = Self::defaults()?.add_source(Environment::default().try_parsing(true));
        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = ConfigLoader::builder()
            .set_default("funkit_api_url", DEFAULT_API_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default(
                "price_refetch_interval_secs",
                DEFAULT_REFRESH_INTERVAL.as_secs() as i64,
            )?
            .set_default("refresh_max_retries", DEFAULT_MAX_RETRIES as i64)?
            .set_default("refresh_base_delay_ms", DEFAULT_BASE_DELAY.as_millis() as i64)?
            .set_default("refresh_max_delay_ms", DEFAULT_MAX_DELAY.as_millis() as i64)?;

        Ok(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration value")?;

        let api_key = settings
            .funkit_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("FUNKIT_API_KEY must be set in environment variables"))?;

        if settings.price_refetch_interval_secs == 0 {
            return Err(anyhow!("PRICE_REFETCH_INTERVAL_SECS must be greater than zero"));
        }

        Ok(Self {
            funkit: FunkitConfig {
                api_url: settings.funkit_api_url,
                api_key,
                request_timeout: Duration::from_secs(settings.request_timeout_secs),
            },
            refresh: RefreshConfig {
                interval: Duration::from_secs(settings.price_refetch_interval_secs),
                max_retries: settings.refresh_max_retries,
                base_delay: Duration::from_millis(settings.refresh_base_delay_ms),
                max_delay: Duration::from_millis(settings.refresh_max_delay_ms),
            },
        })
    }
}
