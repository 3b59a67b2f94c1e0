//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! backend application and provides mechanisms for consistent error handling
//! and response formatting.

use adapters::AdapterError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Identity(#[from] AdapterError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Descriptions to show the caller; collaborator rejections are passed
    /// through verbatim, one entry per reason.
    pub fn descriptions(&self) -> Vec<String> {
        match self {
            AppError::Identity(err) => err.descriptions(),
            other => vec![other.to_string()],
        }
    }

    /// Form errors for failures the caller can correct; anything else is
    /// handed back unchanged.
    pub fn into_form_errors(self) -> Result<Vec<String>> {
        match self {
            AppError::Identity(err) if err.is_rejection() => Ok(err.descriptions()),
            other => Err(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Identity(err) if err.is_rejection() => (StatusCode::BAD_REQUEST, "IDENTITY_REJECTED"),
            AppError::Identity(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IDENTITY_ERROR"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
