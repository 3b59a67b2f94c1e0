//! Authentication module for managing accounts, sessions, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality such as login, registration, session cookies and the role
//! gates that protect the controllers.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::AuthError;
pub use middleware::{require_admin, require_super_admin, require_user};
pub use models::{Dashboard, Principal, SessionState};
pub use routes::account_router;
pub use service::AccountService;
