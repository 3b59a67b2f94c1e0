//! Handler functions for the account controller.
//!
//! These functions process login, registration and sign-out requests,
//! validate the submitted forms and interact with [`AccountService`] for the
//! core business logic. None of them require a session.
//!
//! [`AccountService`]: super::service::AccountService

use axum::{extract::State, Form};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::middleware::{expired_session_cookie, session_cookie, session_token};
use super::models::{Dashboard, LoginForm, RegisterForm, SessionState, INVALID_LOGIN};
use crate::api::outcome::{Outcome, Page};
use crate::errors::Result;
use crate::state::AppState;

pub async fn index() -> Outcome {
    Outcome::view("Index")
}

pub async fn login_page() -> Outcome {
    Outcome::view_with("Login", LoginForm::default())
}

/// Verifies the credentials and sends the caller to the dashboard of their
/// highest-priority role.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<(CookieJar, Outcome)> {
    let form: LoginForm = fields.into_iter().collect();
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok((jar, Outcome::invalid("Login", &form, errors)));
    }

    let authentication = state
        .accounts
        .authenticate(&form.email, &form.password, form.remember_me)
        .await?;

    match SessionState::Authenticating.after(&authentication) {
        SessionState::Authenticated(role) => {
            let jar = match &authentication.ticket {
                Some(ticket) => jar.add(session_cookie(&state.session, ticket)),
                None => jar,
            };
            Ok((jar, Outcome::redirect(Dashboard::from(role).page())))
        }
        _ if authentication.succeeded => {
            // Valid credentials but no role to route to: keep the caller signed out.
            warn!(email = %form.email, "login without a dashboard role");
            let token = authentication.ticket.as_ref().map(|t| t.token.as_str());
            state.accounts.sign_out(token).await?;
            Ok((jar, Outcome::view_with("Login", &form)))
        }
        _ => Ok((jar, Outcome::invalid("Login", &form, vec![INVALID_LOGIN.to_string()]))),
    }
}

pub async fn register_page() -> Outcome {
    Outcome::view_with("Register", RegisterForm::default())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Outcome)> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok((jar, Outcome::invalid("Register", &form, errors)));
    }

    match state.accounts.register(&form.email, &form.password).await {
        Ok(ticket) => {
            let jar = jar.add(session_cookie(&state.session, &ticket));
            Ok((jar, Outcome::redirect(Page::Login)))
        }
        Err(err) => {
            let errors = err.into_form_errors()?;
            debug!(count = errors.len(), "registration rejected");
            Ok((jar, Outcome::invalid("Register", &form, errors)))
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Outcome)> {
    let token = session_token(&jar, &state.session);
    state.accounts.sign_out(token.as_deref()).await?;

    let jar = jar.remove(expired_session_cookie(&state.session));
    Ok((jar, Outcome::redirect(Page::Login)))
}

pub async fn access_denied() -> Outcome {
    Outcome::view("AccessDenied")
}
