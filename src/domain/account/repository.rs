use async_trait::async_trait;

use super::UserAccount;
use crate::domain::DomainResult;

/// Access mode requested when opening a store transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Durable account storage.
///
/// Every directory operation runs inside one transaction obtained from
/// [`begin`](UserStore::begin). Implementations must enforce uniqueness of
/// `username` themselves; a violation surfaces as
/// [`DomainError::DuplicateAccount`](crate::domain::DomainError::DuplicateAccount).
#[async_trait]
pub trait UserStore: Send + Sync {
    type Tx: UserStoreTx;

    async fn begin(&self, mode: TxMode) -> DomainResult<Self::Tx>;
}

/// A scoped store transaction.
///
/// Dropping the handle without calling [`commit`](UserStoreTx::commit)
/// rolls back every write made through it.
#[async_trait]
pub trait UserStoreTx: Send + Sync + Sized {
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool>;

    async fn find_by_username_locked_social(
        &self,
        username: &str,
        locked: bool,
        social: bool,
    ) -> DomainResult<Option<UserAccount>>;

    /// Insert when `account.id` is `None`, update otherwise. Returns the
    /// stored record with its id assigned.
    ///
    /// An update writes only the profile fields (`nickname`, `email`) and
    /// `updated_at`; credentials, flags and role keep their stored values.
    async fn save(&self, account: UserAccount) -> DomainResult<UserAccount>;

    async fn commit(self) -> DomainResult<()>;
}
