//! Login on top of the account directory
//!
//! The directory only exposes stored credentials; this is the component
//! that checks a submitted password against them and issues a session token.

use tracing::{info, warn};

use super::AccountDirectory;
use crate::domain::{AccountRole, DomainError, DomainResult, UserStore};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
    pub role: AccountRole,
}

pub struct Authenticator<S: UserStore> {
    directory: AccountDirectory<S>,
    jwt_config: JwtConfig,
    /// Hash of a throwaway password at the configured cost. Verified against
    /// on a miss so unknown and locked accounts cost as much as a wrong
    /// password.
    decoy_hash: Option<String>,
}

impl<S: UserStore> Authenticator<S> {
    pub fn new(directory: AccountDirectory<S>, jwt_config: JwtConfig) -> Self {
        let decoy_hash = match directory.hasher().hash(&uuid::Uuid::new_v4().to_string()) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!("Could not prepare decoy password hash: {}", e);
                None
            }
        };
        Self {
            directory,
            jwt_config,
            decoy_hash,
        }
    }

    /// Verify `password` for a login-eligible account and return a bearer token.
    ///
    /// Unknown, locked and social accounts fail the same way as a wrong
    /// password.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let creds = match self.directory.load_credentials_for_login(username).await {
            Ok(creds) => creds,
            Err(DomainError::AccountNotFound(_)) => {
                if let Some(decoy) = &self.decoy_hash {
                    let _ = self.directory.hasher().verify(password, decoy);
                }
                metrics::counter!("account_logins_total", "outcome" => "rejected").increment(1);
                warn!(username, "Login for unknown or ineligible account");
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self
            .directory
            .hasher()
            .verify(password, &creds.hashed_password)?
        {
            metrics::counter!("account_logins_total", "outcome" => "rejected").increment(1);
            warn!(username, "Login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = create_token(&creds.username, creds.role, &self.jwt_config)?;

        metrics::counter!("account_logins_total", "outcome" => "success").increment(1);
        info!(username = %creds.username, "Login succeeded");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            username: creds.username,
            role: creds.role,
        })
    }
}
