//! Defines the HTTP routes of the SuperAdmin controller.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::auth::require_super_admin;
use crate::state::AppState;

pub fn super_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/super-admin/dashboard", get(handlers::dashboard))
        .route("/super-admin/add-admin", get(handlers::add_admin_page).post(handlers::add_admin))
        .route("/super-admin/edit-admin", post(handlers::edit_admin))
        .route("/super-admin/edit-admin/:id", get(handlers::edit_admin_page))
        .route("/super-admin/delete-admin/:id", post(handlers::delete_admin))
        .route("/super-admin/user-dashboard", get(handlers::user_dashboard))
        .route("/super-admin/promote-to-admin", post(handlers::promote_to_admin))
        .route_layer(middleware::from_fn_with_state(state, require_super_admin))
}
