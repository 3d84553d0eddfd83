//! # Account Service
//!
//! User-account directory: username lookup, registration, credential
//! loading for login and self-service profile updates, served over REST.
//!
//! ## Architecture
//!
//! - **domain**: account entity, DTOs and the store / hasher ports
//! - **application**: `AccountDirectory` and `Authenticator` use-cases
//! - **infrastructure**: SeaORM and in-memory stores, bcrypt, JWT
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime lifecycle and tracing setup
//! - **shared**: error types and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{AccountDirectory, Authenticator};
pub use infrastructure::{init_database, DatabaseConfig, MemoryUserStore, SeaOrmUserStore};
pub use interfaces::{create_api_router, ApiContext};
