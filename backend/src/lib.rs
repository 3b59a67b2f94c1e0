//! Role-based product management backend.
//!
//! Accounts, sessions and role membership are owned by an
//! [`adapters::IdentityStore`]; this crate layers the account workflow, the
//! role-scoped directories, the product catalogue and the HTTP controllers on
//! top of it.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use adapters::IdentityStore;
use axum::Router;
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::state::AppState;

/// Builds the complete application router.
pub fn build_app(identity: Arc<dyn IdentityStore>, pool: SqlitePool, config: &AppConfig) -> Router {
    let state = AppState::new(identity, pool, config.session.clone());
    api::build_router(state, &config.http)
}
