//! Core `adapters` crate for abstracting the identity collaborator.
//!
//! This crate defines the `IdentityStore` trait, which outlines the account,
//! credential, role-membership and session operations the backend relies on,
//! and provides the concrete implementations (SQLite, in-memory).

pub mod errors;
pub mod memory;
pub mod models;
pub mod password;
pub mod sqlite;

use async_trait::async_trait;

pub use errors::{AdapterError, IdentityError};
pub use memory::MemoryIdentityStore;
pub use models::{Account, Role, RoleSet, SessionTicket};
pub use password::{Argon2Config, PasswordHasher, PasswordPolicy};
pub use sqlite::SqliteIdentityStore;

/// Owns credential storage, password verification, sessions and role
/// membership. Implementations must serialize conflicting writes to the same
/// account; callers do no locking of their own.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AdapterError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AdapterError>;

    /// Creates an account whose user name and email are both `email`.
    ///
    /// Rejected when the email is malformed, the user name is taken, or the
    /// password violates the policy. Nothing is stored on rejection.
    async fn create(&self, email: &str, password: &str) -> Result<Account, AdapterError>;

    /// Persists the user name and email of an existing account.
    async fn update(&self, account: &Account) -> Result<(), AdapterError>;

    /// Removes the account along with its roles and sessions.
    async fn delete(&self, account: &Account) -> Result<(), AdapterError>;

    async fn get_roles(&self, account: &Account) -> Result<RoleSet, AdapterError>;

    async fn add_to_role(&self, account: &Account, role: Role) -> Result<(), AdapterError>;

    async fn remove_from_role(&self, account: &Account, role: Role) -> Result<(), AdapterError>;

    /// Members of `role`, in store order.
    async fn users_in_role(&self, role: Role) -> Result<Vec<Account>, AdapterError>;

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool, AdapterError>;

    async fn sign_in(&self, account: &Account, persistent: bool) -> Result<SessionTicket, AdapterError>;

    /// Revokes the session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &str) -> Result<(), AdapterError>;

    async fn resolve_session(&self, token: &str) -> Result<Option<Account>, AdapterError>;

    /// Number of stored accounts.
    async fn count(&self) -> Result<usize, AdapterError>;
}

/// Fresh random session token, hex encoded.
pub(crate) fn new_session_token() -> String {
    use argon2::password_hash::rand_core::{OsRng, RngCore};

    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
