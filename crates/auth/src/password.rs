//! Password hashing collaborator.
//!
//! bcrypt does the actual work; the trait exists so tests and future
//! backends can swap the cost or the algorithm without touching handlers.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// bcrypt-backed hasher. Production cost is 10; tests lower it.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: 10 }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plain, self.cost).map_err(|e| PasswordError(e.to_string()))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(plain, hash).map_err(|e| PasswordError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("password1").unwrap();
        assert!(hasher.verify("password1", &hash).unwrap());
        assert!(!hasher.verify("password2", &hash).unwrap());
    }
}
