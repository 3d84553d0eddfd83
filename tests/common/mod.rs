// Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use account_service::application::identity::AccountDirectory;
use account_service::domain::PasswordHasher;
use account_service::infrastructure::crypto::password::BcryptHasher;
use account_service::infrastructure::database::entities::account;
use account_service::infrastructure::database::migrator::Migrator;
use account_service::{init_database, DatabaseConfig, SeaOrmUserStore};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;

/// In-memory SQLite with migrations applied.
///
/// Pinned to a single pooled connection: every new `sqlite::memory:`
/// connection would otherwise open its own empty database.
pub async fn setup_test_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 5,
    };
    let db = init_database(&config)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// File-backed SQLite with a real connection pool, for tests that need
/// several connections to contend. The database lives inside `dir`.
pub async fn setup_file_db(dir: &std::path::Path, max_connections: u32) -> DatabaseConnection {
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.join("accounts.db").display()),
        max_connections,
        min_connections: 1,
        connect_timeout_secs: 5,
    };
    let db = init_database(&config)
        .await
        .expect("Failed to open file database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Bcrypt at the minimum cost keeps the suite fast.
pub fn test_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(BcryptHasher::new(4))
}

pub fn test_directory(db: &DatabaseConnection) -> AccountDirectory<SeaOrmUserStore> {
    AccountDirectory::new(Arc::new(SeaOrmUserStore::new(db.clone())), test_hasher())
}

/// Flip the lock / social flags of a stored row, bypassing the directory.
pub async fn set_flags(db: &DatabaseConnection, username: &str, locked: bool, social: bool) {
    account::Entity::update_many()
        .col_expr(account::Column::IsLocked, Expr::value(locked))
        .col_expr(account::Column::IsSocial, Expr::value(social))
        .filter(account::Column::Username.eq(username))
        .exec(db)
        .await
        .expect("Failed to update account flags");
}

pub async fn find_row(db: &DatabaseConnection, username: &str) -> Option<account::Model> {
    account::Entity::find()
        .filter(account::Column::Username.eq(username))
        .one(db)
        .await
        .expect("Failed to query accounts")
}

pub async fn count_rows(db: &DatabaseConnection, username: &str) -> usize {
    account::Entity::find()
        .filter(account::Column::Username.eq(username))
        .all(db)
        .await
        .expect("Failed to query accounts")
        .len()
}
