//! Core business logic for the authentication system.
//!
//! This service handles login, registration and sign-out. Credential checks,
//! hashing, sessions and role membership are delegated to the injected
//! identity store.

use std::sync::Arc;

use adapters::{Account, IdentityStore, Role, RoleSet, SessionTicket};
use tracing::{info, instrument, warn};

use super::models::Authentication;
use crate::errors::{AppError, Result};

pub struct AccountService {
    identity: Arc<dyn IdentityStore>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self { identity }
    }

    /// Verifies the credentials and, on success, opens a session.
    ///
    /// Fails closed: an unknown email or a wrong password yields
    /// [`Authentication::failed`].
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str, remember: bool) -> Result<Authentication> {
        let Some(account) = self.identity.find_by_email(email).await? else {
            info!("login rejected: unknown email");
            return Ok(Authentication::failed());
        };

        if !self.identity.check_password(&account, password).await? {
            info!(account_id = %account.id, "login rejected: wrong password");
            return Ok(Authentication::failed());
        }

        let roles = self.identity.get_roles(&account).await?;
        let ticket = self.identity.sign_in(&account, remember).await?;
        info!(account_id = %account.id, ?roles, "login succeeded");

        Ok(Authentication {
            succeeded: true,
            roles,
            ticket: Some(ticket),
        })
    }

    /// Creates an account with the `User` role and signs it in.
    ///
    /// No account is left behind on failure: if the role cannot be assigned
    /// the freshly created account is deleted again.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<SessionTicket> {
        let account = self.identity.create(email, password).await?;

        if let Err(err) = self.identity.add_to_role(&account, Role::User).await {
            warn!(account_id = %account.id, error = %err, "role assignment failed, rolling back registration");
            if let Err(cleanup) = self.identity.delete(&account).await {
                warn!(account_id = %account.id, error = %cleanup, "rollback of registration failed");
            }
            return Err(AppError::from(err));
        }

        let ticket = self.identity.sign_in(&account, false).await?;
        info!(account_id = %account.id, "registered account");
        Ok(ticket)
    }

    /// Ends the session. Signing out without a session is not an error.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token {
            self.identity.sign_out(token).await?;
        }
        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.identity.find_by_email(email).await?)
    }

    pub async fn get_roles(&self, account: &Account) -> Result<RoleSet> {
        Ok(self.identity.get_roles(account).await?)
    }
}
