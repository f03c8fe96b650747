pub mod catalog_service;
pub mod checkout_service;
pub mod payment_service;
pub mod stats_service;
pub mod token_service;
pub mod user_service;

pub use payment_service::{PaymentProcessor, StripeClient};
pub use token_service::{IdentityClaim, TokenService};
