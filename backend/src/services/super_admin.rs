//! SuperAdmin account lifecycle: admin CRUD plus user promotion.

use std::sync::Arc;

use adapters::{Account, IdentityStore};
use tracing::{info, instrument, warn};

use super::directory::{DirectoryService, MemberRecord, MemberSummary};
use super::OperationResult;
use crate::errors::Result;

pub struct SuperAdminService {
    identity: Arc<dyn IdentityStore>,
    admins: DirectoryService,
    users: DirectoryService,
}

impl SuperAdminService {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            admins: DirectoryService::admins(identity.clone()),
            users: DirectoryService::users(identity.clone()),
            identity,
        }
    }

    pub async fn get_admin_users(&self) -> Result<Vec<MemberSummary>> {
        self.admins.list_members().await
    }

    pub async fn create_admin_user(&self, email: &str, password: &str) -> OperationResult {
        self.admins.add_member(email, password).await.into()
    }

    pub async fn get_admin_user(&self, id: &str) -> Result<Option<MemberRecord>> {
        self.admins.get_member(id).await
    }

    /// Changes the email of an admin. Unknown ids yield a failed result.
    #[instrument(skip(self))]
    pub async fn update_admin_user(&self, id: &str, email: &str) -> OperationResult {
        match self.admins.get_member(id).await {
            Ok(Some(_)) => self.admins.edit_member(id, email).await.into(),
            Ok(None) => OperationResult::failed(format!("Admin user '{id}' was not found.")),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    /// Deletes an admin. Unknown ids yield a failed result.
    #[instrument(skip(self))]
    pub async fn delete_admin_user(&self, id: &str) -> OperationResult {
        match self.admins.get_member(id).await {
            Ok(Some(_)) => self.admins.delete_member(id).await.into(),
            Ok(None) => OperationResult::failed(format!("Admin user '{id}' was not found.")),
            Err(err) => Err::<(), _>(err).into(),
        }
    }

    pub async fn get_users(&self) -> Result<Vec<MemberSummary>> {
        self.users.list_members().await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.identity.find_by_id(id).await?)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> bool {
        match self.users.add_member(email, password).await {
            Ok(_) => true,
            Err(err) => {
                info!(error = %err, "user creation failed");
                false
            }
        }
    }

    /// Sets both email and user name. `false` for unknown ids or rejected updates.
    #[instrument(skip(self))]
    pub async fn update_user(&self, id: &str, email: &str) -> Result<bool> {
        let Some(mut account) = self.identity.find_by_id(id).await? else {
            return Ok(false);
        };

        account.email = email.trim().to_string();
        account.user_name = account.email.clone();
        match self.identity.update(&account).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_rejection() => {
                warn!(error = %err, "user update rejected");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn promote_user_to_admin(&self, user_id: &str) -> Result<bool> {
        self.users.promote_to_admin(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::{MemoryIdentityStore, PasswordHasher};

    fn service() -> (Arc<MemoryIdentityStore>, SuperAdminService) {
        let store = Arc::new(MemoryIdentityStore::new(PasswordHasher::testing()));
        (store.clone(), SuperAdminService::new(store))
    }

    #[tokio::test]
    async fn create_and_list_admins() {
        let (_, service) = service();
        let result = service.create_admin_user("admin@example.com", "Passw0rd!").await;
        assert!(result.succeeded);
        assert!(result.errors.is_empty());

        let admins = service.get_admin_users().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "admin@example.com");
    }

    #[tokio::test]
    async fn create_admin_failure_reports_every_error() {
        let (store, service) = service();
        service.create_admin_user("admin@example.com", "Passw0rd!").await;

        let result = service.create_admin_user("admin@example.com", "weak").await;
        assert!(!result.succeeded);
        assert!(result.errors.len() > 1);
        assert_eq!(result.errors[0], "Username 'admin@example.com' is already taken.");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_admin() {
        let (_, service) = service();
        service.create_admin_user("old@example.com", "Passw0rd!").await;
        let id = service.get_admin_users().await.unwrap()[0].id.clone();

        let result = service.update_admin_user(&id, "new@example.com").await;
        assert!(result.succeeded);
        assert_eq!(service.get_admin_user(&id).await.unwrap().unwrap().email, "new@example.com");

        let missing = service.update_admin_user("missing", "x@example.com").await;
        assert!(!missing.succeeded);
        assert_eq!(missing.errors.len(), 1);
    }

    #[tokio::test]
    async fn delete_admin() {
        let (store, service) = service();
        service.create_admin_user("bye@example.com", "Passw0rd!").await;
        let id = service.get_admin_users().await.unwrap()[0].id.clone();

        assert!(!service.delete_admin_user("missing").await.succeeded);
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(service.delete_admin_user(&id).await.succeeded);
        assert!(service.get_admin_users().await.unwrap().is_empty());
        assert_eq!(service.get_admin_user(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn admin_operations_ignore_plain_users() {
        let (store, service) = service();
        service.create_user("plain@example.com", "Passw0rd!").await;
        let id = service.get_users().await.unwrap()[0].id.clone();

        assert_eq!(service.get_admin_user(&id).await.unwrap(), None);
        assert!(!service.update_admin_user(&id, "other@example.com").await.succeeded);
        assert!(!service.delete_admin_user(&id).await.succeeded);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(service.get_user_by_id(&id).await.unwrap().unwrap().email, "plain@example.com");
    }

    #[tokio::test]
    async fn user_helpers() {
        let (_, service) = service();
        assert!(service.create_user("user@example.com", "Passw0rd!").await);
        assert!(!service.create_user("user@example.com", "Passw0rd!").await);

        let users = service.get_users().await.unwrap();
        assert_eq!(users.len(), 1);
        let id = users[0].id.clone();

        assert!(service.update_user(&id, "renamed@example.com").await.unwrap());
        let account = service.get_user_by_id(&id).await.unwrap().unwrap();
        assert_eq!(account.email, "renamed@example.com");
        assert_eq!(account.user_name, "renamed@example.com");

        assert!(!service.update_user("missing", "x@example.com").await.unwrap());
        assert!(service.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn promote_user() {
        let (_, service) = service();
        service.create_user("climber@example.com", "Passw0rd!").await;
        let id = service.get_users().await.unwrap()[0].id.clone();

        assert!(service.promote_user_to_admin(&id).await.unwrap());
        assert!(service.get_users().await.unwrap().is_empty());
        assert_eq!(service.get_admin_users().await.unwrap()[0].id, id);

        assert!(!service.promote_user_to_admin("unknown-id").await.unwrap());
    }
}
