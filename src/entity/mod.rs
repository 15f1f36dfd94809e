mod price_error;
mod state;
mod swap;
mod token;
mod token_price;

pub use price_error::{ErrorKind, LookupStage, PriceError, ProviderError};
pub use state::{RefreshFailure, RefreshPhase, RefreshSnapshot};
pub use swap::SwapQuote;
pub use token::{SupportedToken, TokenIdentifier};
pub use token_price::{TokenMetadata, TokenPrice, TokenWithPrice};
