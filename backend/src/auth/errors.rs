//! Custom error types specific to authentication failures.
//!
//! A failed role check never produces an error body: the caller is sent to
//! the login page or the access-denied page instead.

use adapters::Role;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::outcome::{Outcome, Page};
use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No session cookie, or one that no longer resolves to an account.
    #[error("authentication required")]
    Unauthenticated,

    #[error("role '{0}' required")]
    Forbidden(Role),

    #[error(transparent)]
    Failure(#[from] AppError),
}

impl From<adapters::AdapterError> for AuthError {
    fn from(err: adapters::AdapterError) -> Self {
        AuthError::Failure(err.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated => Outcome::redirect(Page::Login).into_response(),
            AuthError::Forbidden(_) => Outcome::redirect(Page::AccessDenied).into_response(),
            AuthError::Failure(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[test]
    fn rejections_redirect() {
        let response = AuthError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/account/login");

        let response = AuthError::Forbidden(Role::Admin).into_response();
        assert_eq!(response.headers()[LOCATION], "/account/access-denied");
    }

    #[test]
    fn failures_are_server_errors() {
        let response = AuthError::from(AppError::from(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
