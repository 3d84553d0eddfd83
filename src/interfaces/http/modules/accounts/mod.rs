//! Accounts module: username lookup, registration, own-profile update

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
