//! Handler functions for the product controller.
//!
//! Unknown or malformed product ids never fail a request: edit pages and
//! deletes fall back to the catalogue listing.

use axum::{
    extract::{Path, State},
    Form,
};
use tracing::debug;
use uuid::Uuid;

use crate::api::outcome::{Outcome, Page};
use crate::errors::Result;
use crate::services::ProductForm;
use crate::state::AppState;

pub async fn all_products(State(state): State<AppState>) -> Result<Outcome> {
    let products = state.products.all_products().await?;
    Ok(Outcome::view_with("AllProducts", products))
}

pub async fn add_product_page() -> Outcome {
    Outcome::view_with("AddProduct", ProductForm::default())
}

pub async fn add_product(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Result<Outcome> {
    // New products always get a fresh id.
    let form = ProductForm { id: None, ..form };
    match form.to_product() {
        Ok(product) => {
            state.products.add_product(&product).await?;
            Ok(Outcome::redirect(Page::AllProducts))
        }
        Err(errors) => Ok(Outcome::invalid("AddProduct", &form, errors)),
    }
}

pub async fn update_product_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Outcome> {
    let Ok(id) = Uuid::parse_str(&id) else {
        debug!(%id, "malformed product id");
        return Ok(Outcome::redirect(Page::AllProducts));
    };

    Ok(match state.products.get_product_by_id(id).await? {
        Some(product) => Outcome::view_with("UpdateProduct", ProductForm::from(&product)),
        None => Outcome::redirect(Page::AllProducts),
    })
}

pub async fn edit_product(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Result<Outcome> {
    if form.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        let errors = vec!["The Id field is required.".to_string()];
        return Ok(Outcome::invalid("UpdateProduct", &form, errors));
    }

    match form.to_product() {
        Ok(product) => {
            state.products.update_product(&product).await?;
            Ok(Outcome::redirect(Page::AllProducts))
        }
        Err(errors) => Ok(Outcome::invalid("UpdateProduct", &form, errors)),
    }
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Result<Outcome> {
    match Uuid::parse_str(&id) {
        Ok(id) => state.products.delete_product(id).await?,
        Err(_) => debug!(%id, "malformed product id"),
    }
    Ok(Outcome::redirect(Page::AllProducts))
}
