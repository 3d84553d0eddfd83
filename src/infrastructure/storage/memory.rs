//! In-memory user store for development and testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::OwnedMutexGuard;

use crate::domain::{DomainError, DomainResult, TxMode, UserAccount, UserStore, UserStoreTx};
use crate::shared::errors::InfraError;

/// In-memory [`UserStore`].
///
/// Read-write transactions are serialized by a store-wide lock and stage
/// their writes until commit, so an abandoned transaction leaves no trace.
pub struct MemoryUserStore {
    rows: Arc<DashMap<i64, UserAccount>>,
    next_id: Arc<AtomicI64>,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Committed row for `username`, if any.
    pub fn get(&self, username: &str) -> Option<UserAccount> {
        self.rows
            .iter()
            .find(|row| row.username == username)
            .map(|row| row.value().clone())
    }

    pub fn count_by_username(&self, username: &str) -> usize {
        self.rows.iter().filter(|row| row.username == username).count()
    }

    /// Flip the lock/social flags of a committed row, bypassing the directory.
    /// Returns `false` when no such row exists.
    pub fn set_flags(&self, username: &str, locked: bool, social: bool) -> bool {
        match self.rows.iter_mut().find(|row| row.username == username) {
            Some(mut row) => {
                row.is_locked = locked;
                row.is_social = social;
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryUserTx {
    rows: Arc<DashMap<i64, UserAccount>>,
    next_id: Arc<AtomicI64>,
    staged: Mutex<HashMap<i64, UserAccount>>,
    write_guard: Option<OwnedMutexGuard<()>>,
}

impl MemoryUserTx {
    fn staged(&self) -> std::sync::MutexGuard<'_, HashMap<i64, UserAccount>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Row visible to this transaction: staged writes shadow committed rows.
    fn visible(&self, username: &str) -> Option<UserAccount> {
        let staged = self.staged();
        if let Some(row) = staged.values().find(|row| row.username == username) {
            return Some(row.clone());
        }
        self.rows
            .iter()
            .find(|row| row.username == username && !staged.contains_key(row.key()))
            .map(|row| row.value().clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    type Tx = MemoryUserTx;

    async fn begin(&self, mode: TxMode) -> DomainResult<MemoryUserTx> {
        let write_guard = match mode {
            TxMode::ReadOnly => None,
            TxMode::ReadWrite => Some(Arc::clone(&self.write_lock).lock_owned().await),
        };

        Ok(MemoryUserTx {
            rows: Arc::clone(&self.rows),
            next_id: Arc::clone(&self.next_id),
            staged: Mutex::new(HashMap::new()),
            write_guard,
        })
    }
}

#[async_trait]
impl UserStoreTx for MemoryUserTx {
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        Ok(self.visible(username).is_some())
    }

    async fn find_by_username_locked_social(
        &self,
        username: &str,
        locked: bool,
        social: bool,
    ) -> DomainResult<Option<UserAccount>> {
        Ok(self
            .visible(username)
            .filter(|row| row.is_locked == locked && row.is_social == social))
    }

    async fn save(&self, mut account: UserAccount) -> DomainResult<UserAccount> {
        if self.write_guard.is_none() {
            return Err(
                InfraError::Store("write attempted in a read-only transaction".into()).into(),
            );
        }

        let row = match account.id {
            None => {
                if self.visible(&account.username).is_some() {
                    return Err(DomainError::DuplicateAccount(account.username));
                }
                account.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst));
                account
            }
            Some(id) => {
                let mut stored = self
                    .staged()
                    .get(&id)
                    .cloned()
                    .or_else(|| self.rows.get(&id).map(|row| row.value().clone()))
                    .ok_or_else(|| DomainError::AccountNotFound(account.username.clone()))?;
                stored.nickname = account.nickname;
                stored.email = account.email;
                stored.updated_at = account.updated_at;
                stored
            }
        };

        let id = row.id.unwrap_or_default();
        self.staged().insert(id, row.clone());
        Ok(row)
    }

    async fn commit(self) -> DomainResult<()> {
        let staged = self
            .staged
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for (id, row) in staged {
            self.rows.insert(id, row);
        }
        Ok(())
    }
}
