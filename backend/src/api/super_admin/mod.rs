//! SuperAdmin controller: admin lifecycle and user promotion.
//!
//! Every route requires the `SuperAdmin` role.

pub mod handlers;
pub mod routes;
