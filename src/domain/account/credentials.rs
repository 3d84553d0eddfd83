use super::{AccountRole, UserAccount};

/// What an authenticator needs to check a login attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    pub username: String,
    pub hashed_password: String,
    pub role: AccountRole,
    pub locked: bool,
}

impl From<UserAccount> for LoginCredentials {
    fn from(account: UserAccount) -> Self {
        Self {
            username: account.username,
            hashed_password: account.password_hash,
            role: account.role,
            locked: account.is_locked,
        }
    }
}
