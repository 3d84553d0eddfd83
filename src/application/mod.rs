//! Application layer - account use-cases

pub mod identity;

pub use identity::{AccountDirectory, AuthResult, Authenticator};
