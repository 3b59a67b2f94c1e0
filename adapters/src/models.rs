//! Generic data models for the `adapters` crate.
//!
//! These models define the account, role and session representations shared
//! by every identity store implementation, so the backend services can work
//! against a consistent data format regardless of where accounts live.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, IdentityError};

/// Authorization scope of an account.
///
/// The variant order is the order of increasing privilege, so a
/// `BTreeSet<Role>` iterates from `User` up to `SuperAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::SuperAdmin];

    /// Canonical name, as persisted in role assignments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdapterError::UnknownRole(s.to_string()))
    }
}

/// A registered identity record. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_name: String,
    pub email: String,
}

impl Account {
    pub(crate) fn new(email: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: email.to_string(),
            email: email.to_string(),
        }
    }
}

/// Opaque ticket identifying a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub token: String,
    pub account_id: String,
    /// Survives browser restarts ("remember me").
    pub persistent: bool,
}

pub type RoleSet = BTreeSet<Role>;

/// Upper-cased lookup key; emails and user names compare case-insensitively.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Loose structural check on an email address: one `@`, a non-empty local
/// part and a domain without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Account-level reasons to refuse a new or updated email.
///
/// A taken user name already implies the address is in use, so only one
/// duplicate error is reported.
pub(crate) fn email_errors(email: &str, user_name_taken: bool, email_taken: bool) -> Vec<IdentityError> {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push(IdentityError::invalid_email(email));
    }
    if user_name_taken {
        errors.push(IdentityError::duplicate_user_name(email));
    } else if email_taken {
        errors.push(IdentityError::duplicate_email(email));
    }
    errors
}
