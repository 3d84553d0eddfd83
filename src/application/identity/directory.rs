//! Account directory - application-layer orchestration
//!
//! All account use-cases live here. HTTP handlers are thin wrappers that
//! delegate to [`AccountDirectory`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, DomainResult, LoginCredentials, PasswordHasher, RegisterAccountDto, TxMode,
    UpdateProfileDto, UserAccount, UserStore, UserStoreTx,
};
use crate::shared::errors::InfraError;

/// Account directory over a [`UserStore`].
///
/// Generic over the store so it stays decoupled from the persistence layer.
/// Holds no account state between calls; every operation re-reads the store.
pub struct AccountDirectory<S: UserStore> {
    store: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<S: UserStore> Clone for AccountDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<S: UserStore> AccountDirectory<S> {
    pub fn new(store: Arc<S>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn hasher(&self) -> &Arc<dyn PasswordHasher> {
        &self.hasher
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Whether any account, eligible for login or not, uses `username`.
    pub async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let tx = self.store.begin(TxMode::ReadOnly).await?;
        let exists = tx.exists_by_username(username).await?;
        tx.commit().await?;

        debug!(username, exists, "Checked account existence");
        Ok(exists)
    }

    /// Load the stored credentials of a login-eligible account.
    ///
    /// Does not check any password; that is the authenticator's job.
    pub async fn load_credentials_for_login(
        &self,
        username: &str,
    ) -> DomainResult<LoginCredentials> {
        let tx = self.store.begin(TxMode::ReadOnly).await?;
        let account = find_login_eligible(&tx, username).await?;
        tx.commit().await?;

        Ok(LoginCredentials::from(account))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Register a self-login account and return its id.
    pub async fn register(&self, dto: RegisterAccountDto) -> DomainResult<i64> {
        let tx = self.store.begin(TxMode::ReadWrite).await?;

        if tx.exists_by_username(&dto.username).await? {
            return Err(DomainError::DuplicateAccount(dto.username));
        }

        let password_hash = self.hasher.hash(&dto.password)?;
        let account =
            UserAccount::new_local(dto.username, password_hash, dto.nickname, dto.email);

        let saved = tx.save(account).await?;
        let id = assigned_id(&saved)?;
        tx.commit().await?;

        metrics::counter!("accounts_registered_total").increment(1);
        info!(account_id = id, username = %saved.username, "New account registered");
        Ok(id)
    }

    /// Update the acting principal's own profile and return the account id.
    ///
    /// `acting_identity` is the authenticated username supplied by the
    /// caller. It must equal `changes.username` exactly.
    pub async fn update_profile(
        &self,
        acting_identity: &str,
        changes: UpdateProfileDto,
    ) -> DomainResult<i64> {
        if acting_identity != changes.username {
            warn!(
                acting = acting_identity,
                target_username = %changes.username,
                "Rejected profile update for another account"
            );
            metrics::counter!("account_updates_total", "outcome" => "denied").increment(1);
            return Err(DomainError::AccessDenied {
                acting: acting_identity.to_string(),
                target: changes.username,
            });
        }

        let tx = self.store.begin(TxMode::ReadWrite).await?;
        let mut account = find_login_eligible(&tx, &changes.username).await?;

        account.apply_profile(&changes);
        let saved = tx.save(account).await?;
        let id = assigned_id(&saved)?;
        tx.commit().await?;

        metrics::counter!("account_updates_total", "outcome" => "updated").increment(1);
        info!(account_id = id, username = %saved.username, "Account profile updated");
        Ok(id)
    }
}

// ── Helpers ─────────────────────────────────────────────────────

async fn find_login_eligible<T: UserStoreTx>(tx: &T, username: &str) -> DomainResult<UserAccount> {
    tx.find_by_username_locked_social(username, false, false)
        .await?
        .ok_or_else(|| DomainError::AccountNotFound(username.to_string()))
}

/// A saved row without an id is a store fault; checked before commit so
/// nothing is persisted.
fn assigned_id(account: &UserAccount) -> DomainResult<i64> {
    account.id.ok_or_else(|| {
        InfraError::Store(format!(
            "store returned account '{}' without an id",
            account.username
        ))
        .into()
    })
}
