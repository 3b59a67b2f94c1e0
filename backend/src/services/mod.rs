//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between the identity store, the product
//! tables and the HTTP handlers.

pub mod directory;
pub mod product;
pub mod seed;
pub mod super_admin;

use serde::Serialize;

use crate::errors::AppError;

pub use directory::{DirectoryService, MemberRecord, MemberSummary};
pub use product::{ProductForm, ProductService};
pub use seed::seed_super_admin;
pub use super_admin::SuperAdminService;

/// Success flag plus the reasons an operation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub succeeded: bool,
    pub errors: Vec<String>,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            errors: vec![error.into()],
        }
    }
}

impl<T> From<Result<T, AppError>> for OperationResult {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self {
                succeeded: false,
                errors: err.descriptions(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::{AdapterError, IdentityError};

    #[test]
    fn result_conversion_keeps_every_description() {
        let ok: OperationResult = Ok::<_, AppError>(()).into();
        assert_eq!(ok, OperationResult::ok());

        let rejected = AdapterError::Rejected(vec![
            IdentityError::invalid_email("a"),
            IdentityError::duplicate_email("a"),
        ]);
        let failed: OperationResult = Err::<(), _>(AppError::from(rejected)).into();
        assert!(!failed.succeeded);
        assert_eq!(
            failed.errors,
            vec!["Email 'a' is invalid.".to_string(), "Email 'a' is already taken.".to_string()]
        );
    }
}
