use crate::domain::DomainResult;

/// One-way credential transform.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    fn verify(&self, plaintext: &str, hashed: &str) -> DomainResult<bool>;
}
