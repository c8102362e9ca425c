//! Salted one-way password hashing with Argon2id
//!
//! Digests are PHC strings: algorithm, version, cost and salt travel inside
//! the digest, so verification needs nothing but the digest itself.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::error::{AuthError, AuthResult};

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes and verifies user passwords
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    cost: HashCost,
}

impl CredentialHasher {
    /// Build a hasher; rejects cost parameters argon2 does not accept.
    pub fn new(cost: HashCost) -> AuthResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::ValidationFailure(format!("invalid hash cost: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            cost,
        })
    }

    /// Produce a fresh salted digest of `plaintext`.
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only a digest that cannot be parsed or
    /// uses unsupported parameters is an error.
    pub fn verify(&self, digest: &str, plaintext: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AuthError::MalformedDigest(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::MalformedDigest(e.to_string())),
        }
    }

    pub fn cost(&self) -> HashCost {
        self.cost
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("cost", &self.cost)
            .finish()
    }
}
