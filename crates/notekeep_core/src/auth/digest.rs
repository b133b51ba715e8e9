//! Password digest capability backed by Argon2id.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! the cost parameters travel with every stored digest and verification keeps
//! working after `HashCost` is tuned.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One-way password transform used by registration and login.
pub trait PasswordDigest {
    /// Returns a salted digest of `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, DigestError>;
    /// Constant-time comparison of `plaintext` against a stored digest.
    ///
    /// A malformed digest verifies as `false`.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// Smallest parameters argon2 accepts. Only for tests.
    pub fn low() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    InvalidCost(String),
    Hash(String),
}

impl Display for DigestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCost(details) => write!(f, "invalid hash cost: {details}"),
            Self::Hash(details) => write!(f, "failed to hash password: {details}"),
        }
    }
}

impl Error for DigestError {}

/// Argon2id digest with configurable cost.
#[derive(Debug, Clone)]
pub struct Argon2Digest {
    params: Params,
}

impl Argon2Digest {
    /// Validates `cost` once so hashing cannot fail on parameters later.
    pub fn new(cost: HashCost) -> Result<Self, DigestError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| DigestError::InvalidCost(err.to_string()))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordDigest for Argon2Digest {
    fn hash(&self, plaintext: &str) -> Result<String, DigestError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| DigestError::Hash(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("event=digest_verify module=auth status=error error_code=malformed_digest error={err}");
                return false;
            }
        };
        self.hasher()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{Argon2Digest, DigestError, HashCost, PasswordDigest};

    fn digest() -> Argon2Digest {
        Argon2Digest::new(HashCost::low()).expect("low cost is valid")
    }

    #[test]
    fn hash_is_salted_and_never_plaintext() {
        let digest = digest();
        let first = digest.hash("hunter2").unwrap();
        let second = digest.hash("hunter2").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("hunter2"));
        assert_ne!(first, second);
    }

    #[test]
    fn verify_accepts_only_matching_password() {
        let digest = digest();
        let stored = digest.hash("hunter2").unwrap();
        assert!(digest.verify("hunter2", &stored));
        assert!(!digest.verify("hunter3", &stored));
    }

    #[test]
    fn verify_uses_parameters_embedded_in_digest() {
        let stored = digest().hash("hunter2").unwrap();
        let tuned = Argon2Digest::new(HashCost {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(tuned.verify("hunter2", &stored));
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!digest().verify("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let err = Argon2Digest::new(HashCost {
            iterations: 0,
            ..HashCost::low()
        })
        .unwrap_err();
        assert!(matches!(err, DigestError::InvalidCost(_)));
    }
}
