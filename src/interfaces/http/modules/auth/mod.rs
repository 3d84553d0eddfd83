//! Authentication module: password login issuing bearer tokens

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
