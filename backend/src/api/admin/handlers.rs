//! Handler functions for the admin controller.
//!
//! These functions list, add, edit and delete `User` accounts through the
//! user directory.

use axum::{
    extract::{Path, State},
    Extension, Form,
};
use serde_json::json;
use tracing::debug;

use crate::api::outcome::{Outcome, Page};
use crate::auth::models::{EditMemberForm, Principal, RegisterForm};
use crate::errors::Result;
use crate::state::AppState;

pub async fn dashboard(Extension(principal): Extension<Principal>) -> Outcome {
    Outcome::view_with("AdminDashboard", json!({ "email": principal.account.email }))
}

pub async fn view_user(State(state): State<AppState>) -> Result<Outcome> {
    let users = state.users.list_members().await?;
    Ok(Outcome::view_with("ViewUser", users))
}

pub async fn add_user_page() -> Outcome {
    Outcome::view_with("AddUser", RegisterForm::default())
}

pub async fn add_user(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Result<Outcome> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Outcome::invalid("AddUser", &form, errors));
    }

    match state.users.add_member(&form.email, &form.password).await {
        Ok(_) => Ok(Outcome::redirect(Page::ViewUser)),
        Err(err) => Ok(Outcome::invalid("AddUser", &form, err.into_form_errors()?)),
    }
}

pub async fn edit_user_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Outcome> {
    match state.users.get_member(&id).await? {
        Some(member) => Ok(Outcome::view_with("EditUser", member)),
        None => {
            debug!(%id, "edit requested for unknown user");
            Ok(Outcome::redirect(Page::ViewUser))
        }
    }
}

pub async fn edit_user(State(state): State<AppState>, Form(form): Form<EditMemberForm>) -> Result<Outcome> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Outcome::invalid("EditUser", &form, errors));
    }

    match state.users.edit_member(&form.id, &form.email).await {
        Ok(()) => Ok(Outcome::redirect(Page::ViewUser)),
        Err(err) => Ok(Outcome::invalid("EditUser", &form, err.into_form_errors()?)),
    }
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Outcome> {
    state.users.delete_member(&id).await?;
    Ok(Outcome::redirect(Page::ViewUser))
}
