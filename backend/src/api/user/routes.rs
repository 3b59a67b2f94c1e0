use axum::{middleware, routing::get, Router};

use super::handlers;
use crate::auth::require_user;
use crate::state::AppState;

pub fn user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/dashboard", get(handlers::dashboard))
        .route("/user/view-products", get(handlers::view_products))
        .route_layer(middleware::from_fn_with_state(state, require_user))
}
