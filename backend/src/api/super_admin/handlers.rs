use axum::{
    extract::{Path, State},
    Form,
};
use tracing::warn;

use crate::api::outcome::{Outcome, Page};
use crate::auth::models::{EditMemberForm, PromoteForm, RegisterForm};
use crate::errors::Result;
use crate::state::AppState;

/// Lists the admins.
pub async fn dashboard(State(state): State<AppState>) -> Result<Outcome> {
    let admins = state.super_admin.get_admin_users().await?;
    Ok(Outcome::view_with("SuperAdminDashboard", admins))
}

pub async fn add_admin_page() -> Outcome {
    Outcome::view_with("AddAdmin", RegisterForm::default())
}

pub async fn add_admin(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Outcome {
    let errors = form.validate();
    if !errors.is_empty() {
        return Outcome::invalid("AddAdmin", &form, errors);
    }

    let result = state.super_admin.create_admin_user(&form.email, &form.password).await;
    if result.succeeded {
        Outcome::redirect(Page::SuperAdminDashboard)
    } else {
        Outcome::invalid("AddAdmin", &form, result.errors)
    }
}

pub async fn edit_admin_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Outcome> {
    Ok(match state.super_admin.get_admin_user(&id).await? {
        Some(admin) => Outcome::view_with("EditAdmin", admin),
        None => Outcome::redirect(Page::SuperAdminDashboard),
    })
}

pub async fn edit_admin(State(state): State<AppState>, Form(form): Form<EditMemberForm>) -> Outcome {
    let errors = form.validate();
    if !errors.is_empty() {
        return Outcome::invalid("EditAdmin", &form, errors);
    }

    let result = state.super_admin.update_admin_user(&form.id, &form.email).await;
    if result.succeeded {
        Outcome::redirect(Page::SuperAdminDashboard)
    } else {
        Outcome::invalid("EditAdmin", &form, result.errors)
    }
}

/// Always lands on the dashboard; a failed delete is only logged.
pub async fn delete_admin(State(state): State<AppState>, Path(id): Path<String>) -> Outcome {
    let result = state.super_admin.delete_admin_user(&id).await;
    if !result.succeeded {
        warn!(%id, errors = ?result.errors, "error deleting admin user");
    }
    Outcome::redirect(Page::SuperAdminDashboard)
}

pub async fn user_dashboard(State(state): State<AppState>) -> Result<Outcome> {
    let users = state.super_admin.get_users().await?;
    Ok(Outcome::view_with("UserDashboard", users))
}

pub async fn promote_to_admin(State(state): State<AppState>, Form(form): Form<PromoteForm>) -> Result<Outcome> {
    if !state.super_admin.promote_user_to_admin(&form.user_id).await? {
        warn!(user_id = %form.user_id, "failed to promote user to admin");
    }
    Ok(Outcome::redirect(Page::SuperAdminDashboard))
}
