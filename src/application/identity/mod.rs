//! Identity module - account directory & login
//!
//! [`AccountDirectory`] implements the account use-cases: existence check,
//! registration, credential loading and self-service profile updates.
//! [`Authenticator`] turns loaded credentials into a session token.

pub mod authenticator;
pub mod directory;

pub use authenticator::{AuthResult, Authenticator};
pub use directory::AccountDirectory;
