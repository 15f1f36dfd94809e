pub mod price_view;

pub use price_view::{ConsoleView, PriceView};
