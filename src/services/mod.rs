pub mod aggregation_service;
pub mod refresh_service;

pub use aggregation_service::{AggregationService, TokenAggregationService};
pub use refresh_service::{RefreshConfig, RefreshController, RefreshService};
