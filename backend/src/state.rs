//! Shared application state handed to every handler.

use std::sync::Arc;

use adapters::IdentityStore;
use sqlx::SqlitePool;

use crate::auth::AccountService;
use crate::config::SessionConfig;
use crate::services::{DirectoryService, ProductService, SuperAdminService};

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityStore>,
    pub accounts: Arc<AccountService>,
    pub users: Arc<DirectoryService>,
    pub super_admin: Arc<SuperAdminService>,
    pub products: Arc<ProductService>,
    pub session: Arc<SessionConfig>,
}

impl AppState {
    /// Wires every service to the given identity store and product pool.
    pub fn new(identity: Arc<dyn IdentityStore>, pool: SqlitePool, session: SessionConfig) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(identity.clone())),
            users: Arc::new(DirectoryService::users(identity.clone())),
            super_admin: Arc::new(SuperAdminService::new(identity.clone())),
            products: Arc::new(ProductService::new(pool)),
            session: Arc::new(session),
            identity,
        }
    }
}
