//! Password policy and Argon2id hashing shared by the identity stores.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use log::{debug, warn};
use serde::Deserialize;

use crate::errors::{AdapterError, IdentityError};

/// Rules a new password must satisfy before it is hashed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicy {
    /// Checks `password`, returning one error per violated rule.
    pub fn validate(&self, password: &str) -> Vec<IdentityError> {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(IdentityError::new(
                "PasswordTooShort",
                format!("Passwords must be at least {} characters.", self.min_length),
            ));
        }
        if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            errors.push(IdentityError::new(
                "PasswordRequiresNonAlphanumeric",
                "Passwords must have at least one non alphanumeric character.",
            ));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(IdentityError::new(
                "PasswordRequiresDigit",
                "Passwords must have at least one digit ('0'-'9').",
            ));
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push(IdentityError::new(
                "PasswordRequiresLower",
                "Passwords must have at least one lowercase ('a'-'z').",
            ));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push(IdentityError::new(
                "PasswordRequiresUpper",
                "Passwords must have at least one uppercase ('A'-'Z').",
            ));
        }

        errors
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Config {
    /// Cheap parameters for tests.
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Validates passwords against a policy and produces/verifies PHC hashes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl PasswordHasher {
    pub fn new(config: Argon2Config, policy: PasswordPolicy) -> Result<Self, AdapterError> {
        let params = Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
            .map_err(|e| AdapterError::Hashing(format!("invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            policy,
        })
    }

    /// Hasher with test parameters and the default policy.
    pub fn testing() -> Self {
        let config = Argon2Config::testing();
        let params = Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
            .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            policy: PasswordPolicy::default(),
        }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Applies the policy, then hashes. Policy violations are rejections.
    pub fn hash(&self, password: &str) -> Result<String, AdapterError> {
        let violations = self.policy.validate(password);
        if !violations.is_empty() {
            return Err(AdapterError::Rejected(violations));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AdapterError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AdapterError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AdapterError::Hashing(format!("invalid password hash: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => {
                debug!("password verification succeeded");
                Ok(true)
            }
            Err(argon2::password_hash::Error::Password) => {
                warn!("password verification failed");
                Ok(false)
            }
            Err(e) => Err(AdapterError::Hashing(e.to_string())),
        }
    }
}

impl PasswordHasher {
    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: &str) -> Result<String, AdapterError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AdapterError::Hashing(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, AdapterError> {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AdapterError::Hashing(e.to_string()))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            policy: PasswordPolicy::default(),
        }
    }
}
