//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Each controller router is wrapped in one role gate. The gate resolves the
//! session cookie through the identity store, checks the role set and, on
//! success, attaches a [`Principal`] to the request extensions.

use adapters::{Role, SessionTicket};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use super::errors::AuthError;
use super::models::Principal;
use crate::config::SessionConfig;
use crate::state::AppState;

/// Session token carried by the request, if any.
pub fn session_token(jar: &CookieJar, session: &SessionConfig) -> Option<String> {
    jar.get(&session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Cookie holding `ticket`. Persistent tickets outlive the browser session.
pub fn session_cookie(session: &SessionConfig, ticket: &SessionTicket) -> Cookie<'static> {
    let mut cookie = Cookie::new(session.cookie_name.clone(), ticket.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(session.secure);
    if ticket.persistent {
        cookie.set_max_age(time::Duration::days(session.remember_days));
    }
    cookie
}

/// Cookie that clears the session cookie when removed from the jar.
pub fn expired_session_cookie(session: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(session.cookie_name.clone(), "");
    cookie.set_path("/");
    cookie
}

/// Resolves the caller and requires `required` in their role set.
pub async fn authorize(
    required: Role,
    state: &AppState,
    jar: &CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = session_token(jar, &state.session).ok_or(AuthError::Unauthenticated)?;

    let Some(account) = state.identity.resolve_session(&token).await? else {
        debug!(path = %request.uri().path(), "unknown session");
        return Err(AuthError::Unauthenticated);
    };

    let roles = state.identity.get_roles(&account).await?;
    let principal = Principal { account, roles };
    if !principal.has_role(required) {
        debug!(account_id = %principal.account.id, %required, "access denied");
        return Err(AuthError::Forbidden(required));
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub async fn require_user(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize(Role::User, &state, &jar, request, next).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize(Role::Admin, &state, &jar, request, next).await
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize(Role::SuperAdmin, &state, &jar, request, next).await
}
