// src/funkit/mod.rs
pub mod asset_api;
pub mod config;
pub mod metadata_resolver;
pub mod models;
pub mod price_resolver;
pub mod static_api;

// Re-exports for convenience
pub use asset_api::{AssetApi, FunkitAssetApi};
pub use self::config::Config;
pub use metadata_resolver::{FunkitMetadataResolver, MetadataResolver};
pub use price_resolver::{FunkitPriceResolver, PriceResolver};
pub use static_api::StaticAssetApi;
