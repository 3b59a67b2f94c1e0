//! Admin controller: management of `User` accounts.
//!
//! Every route requires the `Admin` role.

pub mod handlers;
pub mod routes;
