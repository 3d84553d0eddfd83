//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::{DomainResult, PasswordHasher};

/// [`PasswordHasher`] backed by bcrypt.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// `cost` must lie in bcrypt's 4..=31 range; anything else fails at hash time.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        Ok(hash(plaintext, self.cost)?)
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> DomainResult<bool> {
        Ok(verify(plaintext, hashed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = BcryptHasher::new(4);
        let hashed = hasher.hash("secure_password_123").unwrap();

        assert_ne!(hashed, "secure_password_123");
        assert!(hasher.verify("secure_password_123", &hashed).unwrap());
        assert!(!hasher.verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = BcryptHasher::new(4);
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn invalid_cost_is_an_infrastructure_error() {
        let err = BcryptHasher::new(99).hash("pw").unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[test]
    fn garbage_hash_fails_verification() {
        assert!(BcryptHasher::new(4).verify("pw", "not-a-hash").is_err());
    }
}
