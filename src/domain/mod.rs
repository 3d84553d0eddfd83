//! Domain layer - account entity, value objects and ports

pub mod account;

pub use account::{
    AccountRole, LoginCredentials, PasswordHasher, RegisterAccountDto, TxMode, UpdateProfileDto,
    UserAccount, UserStore, UserStoreTx,
};

// Re-export errors from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult};
