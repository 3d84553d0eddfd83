//! Create accounts table migration

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(accounts_table(manager.get_database_backend()))
            .await?;

        // Authoritative username uniqueness; violations map to DuplicateAccount
        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_username")
                    .table(Accounts::Table)
                    .col(Accounts::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

/// The `accounts` table. SQLite only auto-increments an `INTEGER PRIMARY KEY`
/// (rowid alias); other backends get a 64-bit key to match the entity's `i64`.
fn accounts_table(backend: DbBackend) -> TableCreateStatement {
    let mut id = ColumnDef::new(Accounts::Id);
    match backend {
        DbBackend::Sqlite => id.integer(),
        _ => id.big_integer(),
    };
    id.not_null().auto_increment().primary_key();

    Table::create()
        .table(Accounts::Table)
        .if_not_exists()
        .col(&mut id)
        .col(ColumnDef::new(Accounts::Username).string_len(50).not_null())
        .col(ColumnDef::new(Accounts::Password).string_len(255).not_null())
        .col(ColumnDef::new(Accounts::Nickname).string_len(50).null())
        .col(ColumnDef::new(Accounts::Email).string_len(255).null())
        .col(
            ColumnDef::new(Accounts::IsLocked)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Accounts::IsSocial)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Accounts::RoleType)
                .string_len(20)
                .not_null()
                .default("USER"),
        )
        .col(
            ColumnDef::new(Accounts::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Accounts::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
    Username,
    Password,
    Nickname,
    Email,
    IsLocked,
    IsSocial,
    RoleType,
    CreatedAt,
    UpdatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::sea_query::{PostgresQueryBuilder, SqliteQueryBuilder};

    #[test]
    fn sqlite_key_is_a_rowid_alias() {
        let sql = accounts_table(DbBackend::Sqlite).to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#""id" integer NOT NULL PRIMARY KEY AUTOINCREMENT"#), "{sql}");
    }

    #[test]
    fn postgres_key_is_64_bit() {
        let sql = accounts_table(DbBackend::Postgres).to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#""id" bigserial"#), "{sql}");
    }
}
