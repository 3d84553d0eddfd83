use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error("no such login-eligible account: {0}")]
    AccountNotFound(String),

    #[error("can only modify own account")]
    AccessDenied { acting: String, target: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl DomainError {
    /// Whether this error came from the store or another collaborator
    /// rather than from an account rule.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, DomainError::Infra(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Infra(InfraError::Database(e))
    }
}

impl From<jsonwebtoken::errors::Error> for DomainError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        DomainError::Infra(InfraError::Token(e))
    }
}

impl From<bcrypt::BcryptError> for DomainError {
    fn from(e: bcrypt::BcryptError) -> Self {
        DomainError::Infra(InfraError::Crypto(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Startup failed: {0}")]
    Startup(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
