//! Data structures for authentication-related entities.
//!
//! This module defines the login and registration forms, the dashboards a
//! signed-in account is routed to, and the per-request session state used by
//! the authorization gate.

use adapters::{Account, Role, RoleSet, SessionTicket};
use serde::{Deserialize, Serialize};

use crate::api::outcome::Page;

pub const INVALID_LOGIN: &str = "Please enter valid details";

/// Submitted login form. The password is never echoed back.
///
/// Built from the raw field pairs so a checkbox may post `on`, or `true`
/// followed by a hidden `false`, without failing the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub remember_me: bool,
}

impl FromIterator<(String, String)> for LoginForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut form = LoginForm::default();
        let (mut email, mut password) = (None, None);
        for (key, value) in pairs {
            match key.as_str() {
                "email" => {
                    email.get_or_insert(value);
                }
                "password" => {
                    password.get_or_insert(value);
                }
                "remember_me" => form.remember_me |= is_checked(&value),
                _ => {}
            }
        }
        form.email = email.unwrap_or_default();
        form.password = password.unwrap_or_default();
        form
    }
}

fn is_checked(value: &str) -> bool {
    value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("true")
}

impl LoginForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push("The Password field is required.".to_string());
        }
        errors
    }
}

/// Submitted registration form, also used to add users and admins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push("The Password field is required.".to_string());
        } else if self.password != self.confirm_password {
            errors.push("The password and confirmation password do not match.".to_string());
        }
        errors
    }
}

/// Email change for an existing user or admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditMemberForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
}

impl EditMemberForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.id.trim().is_empty() {
            errors.push("The Id field is required.".to_string());
        }
        validate_email(&self.email, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromoteForm {
    #[serde(default)]
    pub user_id: String,
}

pub(crate) fn validate_email(email: &str, errors: &mut Vec<String>) {
    if email.trim().is_empty() {
        errors.push("The Email field is required.".to_string());
    } else if !adapters::models::is_valid_email(email) {
        errors.push("The Email field is not a valid e-mail address.".to_string());
    }
}

/// Role-specific landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    SuperAdmin,
    Admin,
    User,
}

impl Dashboard {
    /// Fixed routing priority: SuperAdmin, then Admin, then User.
    const PRIORITY: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::User];

    /// Dashboard of the highest-priority role in `roles`, if any.
    pub fn for_roles(roles: &RoleSet) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|role| roles.contains(role))
            .map(Self::from)
    }

    pub fn page(self) -> Page {
        match self {
            Dashboard::SuperAdmin => Page::SuperAdminDashboard,
            Dashboard::Admin => Page::AdminDashboard,
            Dashboard::User => Page::UserDashboard,
        }
    }
}

impl From<Role> for Dashboard {
    fn from(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Dashboard::SuperAdmin,
            Role::Admin => Dashboard::Admin,
            Role::User => Dashboard::User,
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, Default)]
pub struct Authentication {
    pub succeeded: bool,
    pub roles: RoleSet,
    pub ticket: Option<SessionTicket>,
}

impl Authentication {
    pub fn failed() -> Self {
        Self::default()
    }
}

/// Where a request stands with respect to login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Credentials submitted, not yet verified.
    Authenticating,
    Authenticated(Role),
}

impl SessionState {
    /// State after a login attempt completes.
    pub fn after(self, authentication: &Authentication) -> Self {
        match self {
            SessionState::Authenticating if authentication.succeeded => {
                match Dashboard::for_roles(&authentication.roles) {
                    Some(dashboard) => SessionState::Authenticated(dashboard.into()),
                    None => SessionState::Anonymous,
                }
            }
            SessionState::Authenticating => SessionState::Anonymous,
            other => other,
        }
    }
}

impl From<Dashboard> for Role {
    fn from(dashboard: Dashboard) -> Self {
        match dashboard {
            Dashboard::SuperAdmin => Role::SuperAdmin,
            Dashboard::Admin => Role::Admin,
            Dashboard::User => Role::User,
        }
    }
}

/// Signed-in caller, attached to the request by the role gate.
#[derive(Debug, Clone)]
pub struct Principal {
    pub account: Account,
    pub roles: RoleSet,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[Role]) -> RoleSet {
        list.iter().copied().collect()
    }

    #[test]
    fn routing_priority() {
        assert_eq!(
            Dashboard::for_roles(&roles(&[Role::User, Role::Admin, Role::SuperAdmin])),
            Some(Dashboard::SuperAdmin)
        );
        assert_eq!(Dashboard::for_roles(&roles(&[Role::User, Role::Admin])), Some(Dashboard::Admin));
        assert_eq!(Dashboard::for_roles(&roles(&[Role::Admin, Role::SuperAdmin])), Some(Dashboard::SuperAdmin));
        assert_eq!(Dashboard::for_roles(&roles(&[Role::User])), Some(Dashboard::User));
        assert_eq!(Dashboard::for_roles(&RoleSet::new()), None);
    }

    #[test]
    fn session_transitions() {
        let success = Authentication {
            succeeded: true,
            roles: roles(&[Role::User, Role::Admin]),
            ticket: None,
        };
        assert_eq!(
            SessionState::Authenticating.after(&success),
            SessionState::Authenticated(Role::Admin)
        );
        assert_eq!(
            SessionState::Authenticating.after(&Authentication::failed()),
            SessionState::Anonymous
        );

        let no_roles = Authentication {
            succeeded: true,
            ..Authentication::failed()
        };
        assert_eq!(SessionState::Authenticating.after(&no_roles), SessionState::Anonymous);
        assert_eq!(SessionState::Anonymous.after(&success), SessionState::Anonymous);
    }

    #[test]
    fn register_form_validation() {
        let mut form = RegisterForm {
            email: "new@example.com".into(),
            password: "Passw0rd!".into(),
            confirm_password: "Passw0rd!".into(),
        };
        assert!(form.validate().is_empty());

        form.confirm_password = "different".into();
        assert_eq!(
            form.validate(),
            vec!["The password and confirmation password do not match.".to_string()]
        );

        form.email = "nope".into();
        assert_eq!(form.validate().len(), 2);
    }

    #[test]
    fn login_form_requires_both_fields() {
        let form = LoginForm::default();
        assert_eq!(
            form.validate(),
            vec![
                "The Email field is required.".to_string(),
                "The Password field is required.".to_string(),
            ]
        );
    }

    fn pairs(list: &[(&str, &str)]) -> LoginForm {
        list.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn login_form_accepts_checkbox_values() {
        let form = pairs(&[("email", "a@b.com"), ("password", "pw"), ("remember_me", "on")]);
        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.password, "pw");
        assert!(form.remember_me);

        assert!(pairs(&[("remember_me", "true"), ("remember_me", "false")]).remember_me);
        assert!(pairs(&[("remember_me", "TRUE")]).remember_me);
        assert!(!pairs(&[("remember_me", "false")]).remember_me);
        assert!(!pairs(&[("email", "a@b.com")]).remember_me);
    }

    #[test]
    fn login_form_keeps_the_first_value_and_ignores_unknown_fields() {
        let form = pairs(&[
            ("email", "first@b.com"),
            ("email", "second@b.com"),
            ("return_url", "/x"),
            ("password", "pw"),
        ]);
        assert_eq!(form.email, "first@b.com");
        assert_eq!(form.password, "pw");
    }

    #[test]
    fn passwords_are_not_serialized() {
        let form = LoginForm {
            email: "a@b.com".into(),
            password: "secret".into(),
            remember_me: true,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn edit_member_form_needs_id_and_email() {
        let form = EditMemberForm::default();
        assert_eq!(form.validate().len(), 2);

        let form = EditMemberForm {
            id: "42".into(),
            email: "ok@example.com".into(),
        };
        assert!(form.validate().is_empty());
    }
}
