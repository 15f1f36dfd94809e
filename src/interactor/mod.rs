pub mod swap_interactor;
pub mod token_interactor;

pub use swap_interactor::{SwapInteractor, SwapInteractorImpl};
pub use token_interactor::{ApiError, TokenInteractor, TokenInteractorImpl};
