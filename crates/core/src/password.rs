//! Password hashing.
//!
//! Bcrypt with a work factor of 10 for production; tests lower the cost so
//! suites stay fast. Plaintext passwords never leave this module's call
//! sites once hashed.

use parish_types::error::{Error, Result};

/// Production bcrypt work factor.
pub const DEFAULT_COST: u32 = 10;

/// One-way password hasher.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with an explicit work factor. Intended for tests, where
    /// bcrypt's minimum cost keeps suites fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(Error::validation("Password must not be empty"));
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| Error::internal(format!("Password hashing failed: {e}")))
    }

    /// Check a plaintext candidate against a stored hash.
    ///
    /// A malformed stored hash is an internal error, not a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| Error::internal(format!("Password verification failed: {e}")))
    }
}
