//! Defines the HTTP routes of the account controller.
//!
//! These routes handle login, registration and sign-out. They are merged into
//! the main router without a role gate.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::state::AppState;

pub fn account_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/account/index", get(handlers::index))
        .route("/account/login", get(handlers::login_page).post(handlers::login))
        .route("/account/register", get(handlers::register_page).post(handlers::register))
        .route("/account/logout", post(handlers::logout))
        .route("/account/access-denied", get(handlers::access_denied))
}
