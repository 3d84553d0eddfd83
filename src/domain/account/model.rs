use chrono::{DateTime, Utc};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountRole {
    #[default]
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "USER",
            AccountRole::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(AccountRole::User),
            "ADMIN" => Ok(AccountRole::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User account as persisted in the store.
///
/// `id` is `None` until the store assigns one on first save.
#[derive(Clone, Debug, PartialEq)]
pub struct UserAccount {
    pub id: Option<i64>,
    pub username: String,
    pub password_hash: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub is_locked: bool,
    pub is_social: bool,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Fresh self-registered account: unlocked, credential-based, `USER` role.
    pub fn new_local(
        username: String,
        password_hash: String,
        nickname: Option<String>,
        email: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            username,
            password_hash,
            nickname,
            email,
            is_locked: false,
            is_social: false,
            role: AccountRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy the mutable profile fields from an update request.
    ///
    /// Username and id are never touched, whatever the request carries.
    pub fn apply_profile(&mut self, changes: &super::UpdateProfileDto) {
        if let Some(nickname) = &changes.nickname {
            self.nickname = Some(nickname.clone());
        }
        if let Some(email) = &changes.email {
            self.email = Some(email.clone());
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpdateProfileDto;

    #[test]
    fn new_local_account_defaults() {
        let account = UserAccount::new_local("carol".into(), "hash".into(), None, None);
        assert_eq!(account.id, None);
        assert_eq!(account.role, AccountRole::User);
        assert!(!account.is_locked);
        assert!(!account.is_social);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn apply_profile_keeps_identity_fields() {
        let mut account = UserAccount::new_local(
            "alice".into(),
            "hash".into(),
            Some("Alice".into()),
            Some("a@x.com".into()),
        );
        account.id = Some(7);

        let changes = UpdateProfileDto {
            username: "mallory".into(),
            nickname: Some("X".into()),
            email: None,
        };
        account.apply_profile(&changes);

        assert_eq!(account.id, Some(7));
        assert_eq!(account.username, "alice");
        assert_eq!(account.nickname.as_deref(), Some("X"));
        assert_eq!(account.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<AccountRole>(), Ok(AccountRole::Admin));
        assert_eq!(AccountRole::User.to_string(), "USER");
        assert!("root".parse::<AccountRole>().is_err());
    }
}
