//! Central module for organizing the application's controllers.
//!
//! Each controller owns its routes and its role gate; this module merges them
//! with the account routes and the health check into one router.

pub mod admin;
pub mod outcome;
pub mod product;
pub mod super_admin;
pub mod user;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::auth::account_router;
use crate::config::HttpConfig;
use crate::middleware::{cors_layer, trace_layer};
use crate::state::AppState;

pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .merge(account_router())
        .merge(admin::routes::admin_router(state.clone()))
        .merge(super_admin::routes::super_admin_router(state.clone()))
        .merge(user::routes::user_router(state.clone()))
        .merge(product::routes::product_router(state.clone()))
        .route("/health", get(health))
        .with_state(state)
        .layer(trace_layer());

    match cors_layer(http) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
