//! Account aggregate
//!
//! Contains the account entity, DTOs, and the store and hasher interfaces.

pub mod credentials;
pub mod hasher;
pub mod model;
pub mod repository;

mod dto_register;
mod dto_update;

pub use credentials::LoginCredentials;
pub use hasher::PasswordHasher;
pub use model::{AccountRole, UserAccount};
pub use repository::{TxMode, UserStore, UserStoreTx};

pub use dto_register::RegisterAccountDto;
pub use dto_update::UpdateProfileDto;
