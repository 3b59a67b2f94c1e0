//! Defines the HTTP routes of the product controller.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::auth::require_admin;
use crate::state::AppState;

pub fn product_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/product/all-products", get(handlers::all_products))
        .route("/product/add-product", get(handlers::add_product_page).post(handlers::add_product))
        .route("/product/update-product/:id", get(handlers::update_product_page))
        .route("/product/edit-product", post(handlers::edit_product))
        .route("/product/delete-product/:id", post(handlers::delete_product))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
