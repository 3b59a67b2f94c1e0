//! Product controller: catalogue maintenance, restricted to `Admin`.

pub mod handlers;
pub mod routes;
