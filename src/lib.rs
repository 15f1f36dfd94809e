pub mod catalog;
pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod funkit;
pub mod interactor;
pub mod presenter;
pub mod services;
pub mod utils;
pub mod view;

// Re-export commonly used items
pub use self::config::AppConfig;
pub use di::*;
pub use entity::*;
pub use interactor::*;
pub use presenter::*;
pub use services::*;
pub use view::*;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
