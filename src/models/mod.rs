pub mod payment;
pub mod user;

pub use payment::*;
pub use user::*;
