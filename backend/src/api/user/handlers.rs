//! Handler functions for the user controller.

use axum::{extract::State, Extension};
use serde_json::json;

use crate::api::outcome::Outcome;
use crate::auth::models::Principal;
use crate::errors::Result;
use crate::state::AppState;

pub async fn dashboard(Extension(principal): Extension<Principal>) -> Outcome {
    Outcome::view_with("UserDashboard", json!({ "email": principal.account.email }))
}

pub async fn view_products(State(state): State<AppState>) -> Result<Outcome> {
    let products = state.products.all_products().await?;
    Ok(Outcome::view_with("ViewProducts", products))
}
