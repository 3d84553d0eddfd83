use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter, Set,
    SqlErr, TransactionTrait, Unchanged,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::{
    AccountRole, DomainError, DomainResult, TxMode, UserAccount, UserStore, UserStoreTx,
};
use crate::infrastructure::database::entities::account;

/// SeaORM-backed [`UserStore`].
///
/// On SQLite, read-write transactions are serialized through a store-wide
/// lock. Two deferred SQLite transactions that both read and then write
/// cannot both upgrade to the write lock, and the loser would fail with
/// `SQLITE_BUSY` before reaching the username index. Clones share the lock;
/// build one store per database.
#[derive(Clone)]
pub struct SeaOrmUserStore {
    db: DatabaseConnection,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl SeaOrmUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let write_lock = (db.get_database_backend() == DbBackend::Sqlite)
            .then(|| Arc::new(Mutex::new(())));
        Self { db, write_lock }
    }
}

/// Open database transaction. Rolled back by SeaORM when dropped uncommitted.
pub struct SeaOrmUserTx {
    // Field order matters: the transaction is dropped (rolled back) before
    // the write lock is released.
    txn: DatabaseTransaction,
    _write_guard: Option<OwnedMutexGuard<()>>,
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: account::RoleType) -> AccountRole {
    match role {
        account::RoleType::User => AccountRole::User,
        account::RoleType::Admin => AccountRole::Admin,
    }
}

fn domain_role_to_entity(role: AccountRole) -> account::RoleType {
    match role {
        AccountRole::User => account::RoleType::User,
        AccountRole::Admin => account::RoleType::Admin,
    }
}

fn account_model_to_domain(model: account::Model) -> UserAccount {
    UserAccount {
        id: Some(model.id),
        username: model.username,
        password_hash: model.password,
        nickname: model.nickname,
        email: model.email,
        is_locked: model.is_locked,
        is_social: model.is_social,
        role: entity_role_to_domain(model.role_type),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Map a write failure, turning a username unique-index hit into `DuplicateAccount`.
fn write_err(e: DbErr, username: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::DuplicateAccount(username.to_string())
        }
        _ => match e {
            DbErr::RecordNotUpdated => DomainError::AccountNotFound(username.to_string()),
            other => other.into(),
        },
    }
}

// ── Store implementation ────────────────────────────────────────

#[async_trait]
impl UserStore for SeaOrmUserStore {
    type Tx = SeaOrmUserTx;

    async fn begin(&self, mode: TxMode) -> DomainResult<SeaOrmUserTx> {
        let (txn, write_guard) = match mode {
            TxMode::ReadOnly => {
                // SQLite has no per-transaction access mode
                let access = (self.db.get_database_backend() != DbBackend::Sqlite)
                    .then_some(AccessMode::ReadOnly);
                (self.db.begin_with_config(None, access).await?, None)
            }
            TxMode::ReadWrite => {
                let guard = match &self.write_lock {
                    Some(lock) => Some(Arc::clone(lock).lock_owned().await),
                    None => None,
                };
                (self.db.begin().await?, guard)
            }
        };
        Ok(SeaOrmUserTx {
            txn,
            _write_guard: write_guard,
        })
    }
}

#[async_trait]
impl UserStoreTx for SeaOrmUserTx {
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let count = account::Entity::find()
            .filter(account::Column::Username.eq(username))
            .count(&self.txn)
            .await?;

        Ok(count > 0)
    }

    async fn find_by_username_locked_social(
        &self,
        username: &str,
        locked: bool,
        social: bool,
    ) -> DomainResult<Option<UserAccount>> {
        let model = account::Entity::find()
            .filter(account::Column::Username.eq(username))
            .filter(account::Column::IsLocked.eq(locked))
            .filter(account::Column::IsSocial.eq(social))
            .one(&self.txn)
            .await?;

        Ok(model.map(account_model_to_domain))
    }

    async fn save(&self, account: UserAccount) -> DomainResult<UserAccount> {
        let username = account.username.clone();

        let model = match account.id {
            None => {
                let new_account = account::ActiveModel {
                    id: NotSet,
                    username: Set(account.username),
                    password: Set(account.password_hash),
                    nickname: Set(account.nickname),
                    email: Set(account.email),
                    is_locked: Set(account.is_locked),
                    is_social: Set(account.is_social),
                    role_type: Set(domain_role_to_entity(account.role)),
                    created_at: Set(account.created_at),
                    updated_at: Set(account.updated_at),
                };
                new_account
                    .insert(&self.txn)
                    .await
                    .map_err(|e| write_err(e, &username))?
            }
            Some(id) => {
                // Profile columns only; a concurrent lock or role change survives
                let changed = account::ActiveModel {
                    id: Unchanged(id),
                    nickname: Set(account.nickname),
                    email: Set(account.email),
                    updated_at: Set(account.updated_at),
                    ..Default::default()
                };
                changed
                    .update(&self.txn)
                    .await
                    .map_err(|e| write_err(e, &username))?
            }
        };

        debug!(account_id = model.id, username = %model.username, "Account row saved");
        Ok(account_model_to_domain(model))
    }

    async fn commit(self) -> DomainResult<()> {
        self.txn.commit().await?;
        Ok(())
    }
}
