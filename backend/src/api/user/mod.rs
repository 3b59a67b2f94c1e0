//! User controller: the landing page and product catalogue for `User`
//! accounts.

pub mod handlers;
pub mod routes;
