//! Handler outcomes.
//!
//! Every action ends in one of three ways: render a named view with its model,
//! render a view with form errors, or redirect to a named page. Views are
//! serialized as JSON; redirects use `303 See Other`.

use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Serialize;
use serde_json::Value;

/// Redirect targets, one per parameterless action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    AccessDenied,
    SuperAdminDashboard,
    AdminDashboard,
    UserDashboard,
    ViewUser,
    AllProducts,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Login => "/account/login",
            Page::AccessDenied => "/account/access-denied",
            Page::SuperAdminDashboard => "/super-admin/dashboard",
            Page::AdminDashboard => "/admin/dashboard",
            Page::UserDashboard => "/user/dashboard",
            Page::ViewUser => "/admin/view-user",
            Page::AllProducts => "/product/all-products",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    View {
        view: &'static str,
        model: Value,
        errors: Vec<String>,
    },
    Redirect(Page),
}

#[derive(Serialize)]
struct ViewBody<'a> {
    view: &'a str,
    model: &'a Value,
    errors: &'a [String],
}

impl Outcome {
    /// View without a model.
    pub fn view(view: &'static str) -> Self {
        Self::View {
            view,
            model: Value::Null,
            errors: Vec::new(),
        }
    }

    pub fn view_with(view: &'static str, model: impl Serialize) -> Self {
        Self::View {
            view,
            model: to_model(model),
            errors: Vec::new(),
        }
    }

    /// Re-render `view` with the submitted input and the reasons it failed.
    pub fn invalid(view: &'static str, model: impl Serialize, errors: Vec<String>) -> Self {
        Self::View {
            view,
            model: to_model(model),
            errors,
        }
    }

    pub fn redirect(page: Page) -> Self {
        Self::Redirect(page)
    }
}

fn to_model(model: impl Serialize) -> Value {
    // Models are plain structs and vectors; serialization cannot fail for them.
    serde_json::to_value(model).unwrap_or(Value::Null)
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::View { view, model, errors } => Json(ViewBody {
                view,
                model: &model,
                errors: &errors,
            })
            .into_response(),
            Outcome::Redirect(page) => Redirect::to(page.path()).into_response(),
        }
    }
}
