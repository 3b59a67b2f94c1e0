//! Custom error types specific to the `adapters` crate.
//!
//! Every identity operation either succeeds or fails with an [`AdapterError`].
//! Rejections carry the individual [`IdentityError`]s so callers can surface
//! each description to the user verbatim.

use std::fmt;

use thiserror::Error;

use crate::models::Role;

/// A single reason an identity operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    pub code: &'static str,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: &'static str, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    pub fn duplicate_user_name(user_name: &str) -> Self {
        Self::new("DuplicateUserName", format!("Username '{user_name}' is already taken."))
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::new("DuplicateEmail", format!("Email '{email}' is already taken."))
    }

    pub fn invalid_email(email: &str) -> Self {
        Self::new("InvalidEmail", format!("Email '{email}' is invalid."))
    }

    pub fn already_in_role(role: Role) -> Self {
        Self::new("UserAlreadyInRole", format!("User already in role '{role}'."))
    }

    pub fn not_in_role(role: Role) -> Self {
        Self::new("UserNotInRole", format!("User is not in role '{role}'."))
    }

    pub fn unknown_account(id: &str) -> Self {
        Self::new("UnknownAccount", format!("No account with id '{id}' exists."))
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("identity operation rejected: {}", join_descriptions(.0))]
    Rejected(Vec<IdentityError>),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("identity storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AdapterError {
    pub fn rejected(error: IdentityError) -> Self {
        Self::Rejected(vec![error])
    }

    /// Human-readable descriptions, one per underlying failure.
    pub fn descriptions(&self) -> Vec<String> {
        match self {
            AdapterError::Rejected(errors) => {
                errors.iter().map(|e| e.description.clone()).collect()
            }
            other => vec![other.to_string()],
        }
    }

    /// The store refused the request, as opposed to failing to serve it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AdapterError::Rejected(_))
    }
}

fn join_descriptions(errors: &[IdentityError]) -> String {
    errors
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_keeps_every_description_in_order() {
        let err = AdapterError::Rejected(vec![
            IdentityError::duplicate_user_name("a@b.com"),
            IdentityError::invalid_email("a@b.com"),
        ]);
        assert_eq!(
            err.descriptions(),
            vec![
                "Username 'a@b.com' is already taken.".to_string(),
                "Email 'a@b.com' is invalid.".to_string(),
            ]
        );
        assert!(err.is_rejection());
        assert!(err.to_string().contains("; "));
    }

    #[test]
    fn non_rejection_describes_itself() {
        let err = AdapterError::Hashing("bad params".into());
        assert_eq!(err.descriptions(), vec!["password hashing failed: bad params".to_string()]);
        assert!(!err.is_rejection());
    }
}
