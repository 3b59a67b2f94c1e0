//! Defines the HTTP routes of the admin controller.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::auth::require_admin;
use crate::state::AppState;

pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(handlers::dashboard))
        .route("/admin/view-user", get(handlers::view_user))
        .route("/admin/add-user", get(handlers::add_user_page).post(handlers::add_user))
        .route("/admin/edit-user", post(handlers::edit_user))
        .route("/admin/edit-user/:id", get(handlers::edit_user_page))
        .route("/admin/delete-user/:id", post(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
