//! In-process identity store.
//!
//! Keeps accounts, role assignments and sessions in insertion-ordered maps
//! behind a single `RwLock`. Nothing survives a restart; used by tests and
//! for throwaway runs.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::RwLock;

use crate::errors::{AdapterError, IdentityError};
use crate::models::{email_errors, normalize, Account, Role, RoleSet, SessionTicket};
use crate::password::PasswordHasher;
use crate::{new_session_token, IdentityStore};

struct StoredAccount {
    account: Account,
    password_hash: String,
    roles: RoleSet,
}

#[derive(Default)]
struct Inner {
    /// Insertion order doubles as listing order.
    accounts: Vec<StoredAccount>,
    sessions: HashMap<String, SessionTicket>,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.accounts.iter().position(|s| s.account.id == id)
    }

    fn stored(&self, id: &str) -> Result<&StoredAccount, AdapterError> {
        self.accounts
            .iter()
            .find(|s| s.account.id == id)
            .ok_or_else(|| AdapterError::rejected(IdentityError::unknown_account(id)))
    }

    fn stored_mut(&mut self, id: &str) -> Result<&mut StoredAccount, AdapterError> {
        self.accounts
            .iter_mut()
            .find(|s| s.account.id == id)
            .ok_or_else(|| AdapterError::rejected(IdentityError::unknown_account(id)))
    }

    fn user_name_taken(&self, user_name: &str, except_id: Option<&str>) -> bool {
        let key = normalize(user_name);
        self.accounts
            .iter()
            .any(|s| Some(s.account.id.as_str()) != except_id && normalize(&s.account.user_name) == key)
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        let key = normalize(email);
        self.accounts
            .iter()
            .any(|s| Some(s.account.id.as_str()) != except_id && normalize(&s.account.email) == key)
    }
}

pub struct MemoryIdentityStore {
    hasher: PasswordHasher,
    inner: RwLock<Inner>,
}

impl MemoryIdentityStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            hasher,
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryIdentityStore {
    fn default() -> Self {
        Self::new(PasswordHasher::default())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AdapterError> {
        let key = normalize(email);
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .find(|s| normalize(&s.account.email) == key)
            .map(|s| s.account.clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AdapterError> {
        let inner = self.inner.read().await;
        Ok(inner.position(id).map(|i| inner.accounts[i].account.clone()))
    }

    async fn create(&self, email: &str, password: &str) -> Result<Account, AdapterError> {
        let email = email.trim();
        {
            let inner = self.inner.read().await;
            let mut errors =
                email_errors(email, inner.user_name_taken(email, None), inner.email_taken(email, None));
            errors.extend(self.hasher.policy().validate(password));
            if !errors.is_empty() {
                return Err(AdapterError::Rejected(errors));
            }
        }

        let password_hash = self.hasher.hash_blocking(password).await?;

        let mut inner = self.inner.write().await;
        // Re-check under the write lock; another create may have raced us.
        let errors = email_errors(email, inner.user_name_taken(email, None), inner.email_taken(email, None));
        if !errors.is_empty() {
            return Err(AdapterError::Rejected(errors));
        }

        let account = Account::new(email);
        inner.accounts.push(StoredAccount {
            account: account.clone(),
            password_hash,
            roles: RoleSet::new(),
        });
        info!("created account {}", account.id);
        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<(), AdapterError> {
        let mut inner = self.inner.write().await;
        let email_taken = inner.email_taken(&account.email, Some(&account.id));
        let errors = email_errors(&account.email, false, email_taken);
        if !errors.is_empty() {
            return Err(AdapterError::Rejected(errors));
        }
        if inner.user_name_taken(&account.user_name, Some(&account.id)) {
            return Err(AdapterError::rejected(IdentityError::duplicate_user_name(&account.user_name)));
        }

        let stored = inner.stored_mut(&account.id)?;
        stored.account.email = account.email.trim().to_string();
        stored.account.user_name = account.user_name.clone();
        debug!("updated account {}", account.id);
        Ok(())
    }

    async fn delete(&self, account: &Account) -> Result<(), AdapterError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .position(&account.id)
            .ok_or_else(|| AdapterError::rejected(IdentityError::unknown_account(&account.id)))?;
        inner.accounts.remove(index);
        inner.sessions.retain(|_, ticket| ticket.account_id != account.id);
        info!("deleted account {}", account.id);
        Ok(())
    }

    async fn get_roles(&self, account: &Account) -> Result<RoleSet, AdapterError> {
        let inner = self.inner.read().await;
        Ok(inner.stored(&account.id)?.roles.clone())
    }

    async fn add_to_role(&self, account: &Account, role: Role) -> Result<(), AdapterError> {
        let mut inner = self.inner.write().await;
        let stored = inner.stored_mut(&account.id)?;
        if !stored.roles.insert(role) {
            return Err(AdapterError::rejected(IdentityError::already_in_role(role)));
        }
        debug!("added account {} to role {}", account.id, role);
        Ok(())
    }

    async fn remove_from_role(&self, account: &Account, role: Role) -> Result<(), AdapterError> {
        let mut inner = self.inner.write().await;
        let stored = inner.stored_mut(&account.id)?;
        if !stored.roles.remove(&role) {
            return Err(AdapterError::rejected(IdentityError::not_in_role(role)));
        }
        debug!("removed account {} from role {}", account.id, role);
        Ok(())
    }

    async fn users_in_role(&self, role: Role) -> Result<Vec<Account>, AdapterError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .filter(|s| s.roles.contains(&role))
            .map(|s| s.account.clone())
            .collect())
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool, AdapterError> {
        let hash = {
            let inner = self.inner.read().await;
            match inner.position(&account.id) {
                Some(i) => inner.accounts[i].password_hash.clone(),
                None => return Ok(false),
            }
        };
        self.hasher.verify_blocking(password, &hash).await
    }

    async fn sign_in(&self, account: &Account, persistent: bool) -> Result<SessionTicket, AdapterError> {
        let mut inner = self.inner.write().await;
        inner.stored(&account.id)?;

        let ticket = SessionTicket {
            token: new_session_token(),
            account_id: account.id.clone(),
            persistent,
        };
        inner.sessions.insert(ticket.token.clone(), ticket.clone());
        Ok(ticket)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AdapterError> {
        self.inner.write().await.sessions.remove(token);
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<Account>, AdapterError> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .get(token)
            .and_then(|ticket| inner.position(&ticket.account_id))
            .map(|i| inner.accounts[i].account.clone()))
    }

    async fn count(&self) -> Result<usize, AdapterError> {
        Ok(self.inner.read().await.accounts.len())
    }
}
