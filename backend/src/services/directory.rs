//! Role-scoped account directory.
//!
//! One [`DirectoryService`] manages the members of a single role: listing,
//! adding, editing and deleting them, and promoting a member to `Admin`.

use std::sync::Arc;

use adapters::{Account, IdentityStore, Role};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::{AppError, Result};

/// Listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Editable view of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub email: String,
}

impl From<Account> for MemberSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.user_name,
            email: account.email,
        }
    }
}

impl From<Account> for MemberRecord {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
        }
    }
}

pub struct DirectoryService {
    identity: Arc<dyn IdentityStore>,
    role: Role,
}

impl DirectoryService {
    pub fn new(identity: Arc<dyn IdentityStore>, role: Role) -> Self {
        Self { identity, role }
    }

    pub fn users(identity: Arc<dyn IdentityStore>) -> Self {
        Self::new(identity, Role::User)
    }

    pub fn admins(identity: Arc<dyn IdentityStore>) -> Self {
        Self::new(identity, Role::Admin)
    }

    /// Members of the directory's role, in store order.
    pub async fn list_members(&self) -> Result<Vec<MemberSummary>> {
        let members = self.identity.users_in_role(self.role).await?;
        debug!(role = %self.role, count = members.len(), "listed members");
        Ok(members.into_iter().map(MemberSummary::from).collect())
    }

    /// Creates an account and assigns the directory's role.
    ///
    /// When creation is rejected no role assignment is attempted. When the
    /// assignment fails the new account is removed again.
    #[instrument(skip(self, password), fields(role = %self.role))]
    pub async fn add_member(&self, email: &str, password: &str) -> Result<Account> {
        let account = self.identity.create(email, password).await?;

        if let Err(err) = self.identity.add_to_role(&account, self.role).await {
            warn!(account_id = %account.id, error = %err, "role assignment failed, removing account");
            if let Err(cleanup) = self.identity.delete(&account).await {
                warn!(account_id = %account.id, error = %cleanup, "failed to remove account");
            }
            return Err(AppError::from(err));
        }

        info!(account_id = %account.id, "added member");
        Ok(account)
    }

    /// The account behind `id`, if it holds the directory's role.
    async fn find_member(&self, id: &str) -> Result<Option<Account>> {
        let Some(account) = self.identity.find_by_id(id).await? else {
            return Ok(None);
        };
        if self.identity.get_roles(&account).await?.contains(&self.role) {
            Ok(Some(account))
        } else {
            debug!(account_id = %account.id, role = %self.role, "account is not a member");
            Ok(None)
        }
    }

    pub async fn get_member(&self, id: &str) -> Result<Option<MemberRecord>> {
        Ok(self.find_member(id).await?.map(MemberRecord::from))
    }

    /// Replaces the email of `id`. Unknown ids and accounts outside the
    /// directory's role are skipped silently.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn edit_member(&self, id: &str, new_email: &str) -> Result<()> {
        let Some(mut account) = self.find_member(id).await? else {
            debug!("edit skipped: no such member");
            return Ok(());
        };

        account.email = new_email.trim().to_string();
        self.identity.update(&account).await?;
        info!("edited member");
        Ok(())
    }

    /// Deletes `id`. Unknown ids and accounts outside the directory's role
    /// are skipped silently.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn delete_member(&self, id: &str) -> Result<()> {
        let Some(account) = self.find_member(id).await? else {
            debug!("delete skipped: no such member");
            return Ok(());
        };

        self.identity.delete(&account).await?;
        info!("deleted member");
        Ok(())
    }

    /// Adds `Admin` to the account and drops the directory's role.
    ///
    /// Returns `false` when the account does not exist or the `Admin` role
    /// cannot be added. Once `Admin` is added the promotion counts as done,
    /// even if removing the previous role fails; the account then keeps both.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn promote_to_admin(&self, user_id: &str) -> Result<bool> {
        let Some(account) = self.identity.find_by_id(user_id).await? else {
            info!("promotion refused: no such account");
            return Ok(false);
        };

        if let Err(err) = self.identity.add_to_role(&account, Role::Admin).await {
            info!(error = %err, "promotion refused");
            return Ok(false);
        }

        if let Err(err) = self.identity.remove_from_role(&account, self.role).await {
            warn!(account_id = %account.id, error = %err, "promoted, but previous role was not removed");
        }

        info!(account_id = %account.id, "promoted to admin");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::{MemoryIdentityStore, PasswordHasher, RoleSet};

    fn directory(role: Role) -> (Arc<MemoryIdentityStore>, DirectoryService) {
        let store = Arc::new(MemoryIdentityStore::new(PasswordHasher::testing()));
        (store.clone(), DirectoryService::new(store, role))
    }

    fn roles(list: &[Role]) -> RoleSet {
        list.iter().copied().collect()
    }

    #[tokio::test]
    async fn add_and_list_members() {
        let (store, users) = directory(Role::User);
        users.add_member("one@example.com", "Passw0rd!").await.unwrap();
        users.add_member("two@example.com", "Passw0rd!").await.unwrap();

        let admin = store.create("admin@example.com", "Passw0rd!").await.unwrap();
        store.add_to_role(&admin, Role::Admin).await.unwrap();

        let listed: Vec<String> = users.list_members().await.unwrap().into_iter().map(|m| m.email).collect();
        assert_eq!(listed, vec!["one@example.com", "two@example.com"]);

        let first = &users.list_members().await.unwrap()[0];
        assert_eq!(first.name, "one@example.com");
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let (_, admins) = directory(Role::Admin);
        assert!(admins.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_creation_assigns_no_role() {
        let (store, users) = directory(Role::User);
        let err = users.add_member("bad", "weak").await.unwrap_err();

        assert!(err.descriptions().len() > 1);
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.users_in_role(Role::User).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_member() {
        let (_, users) = directory(Role::User);
        let account = users.add_member("get@example.com", "Passw0rd!").await.unwrap();

        let record = users.get_member(&account.id).await.unwrap().unwrap();
        assert_eq!(record, MemberRecord { id: account.id, email: "get@example.com".into() });
        assert_eq!(users.get_member("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn edit_changes_only_the_email() {
        let (store, users) = directory(Role::User);
        let account = users.add_member("before@example.com", "Passw0rd!").await.unwrap();

        users.edit_member(&account.id, "after@example.com").await.unwrap();

        let record = users.get_member(&account.id).await.unwrap().unwrap();
        assert_eq!(record.email, "after@example.com");
        assert_eq!(record.id, account.id);

        let stored = store.find_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(stored.user_name, "before@example.com");
        assert_eq!(store.get_roles(&stored).await.unwrap(), roles(&[Role::User]));
    }

    #[tokio::test]
    async fn edit_of_unknown_id_is_a_no_op() {
        let (store, users) = directory(Role::User);
        users.add_member("keep@example.com", "Passw0rd!").await.unwrap();

        users.edit_member("missing", "other@example.com").await.unwrap();
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn edit_surfaces_collaborator_errors() {
        let (_, users) = directory(Role::User);
        users.add_member("taken@example.com", "Passw0rd!").await.unwrap();
        let account = users.add_member("mine@example.com", "Passw0rd!").await.unwrap();

        let err = users.edit_member(&account.id, "taken@example.com").await.unwrap_err();
        assert_eq!(err.descriptions(), vec!["Email 'taken@example.com' is already taken.".to_string()]);
    }

    #[tokio::test]
    async fn delete_member_and_unknown_id() {
        let (store, users) = directory(Role::User);
        let account = users.add_member("gone@example.com", "Passw0rd!").await.unwrap();

        users.delete_member("missing").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        users.delete_member(&account.id).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(users.get_member(&account.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_roles_are_out_of_reach() {
        let (store, users) = directory(Role::User);
        let owner = store.create("owner@example.com", "Passw0rd!").await.unwrap();
        store.add_to_role(&owner, Role::SuperAdmin).await.unwrap();

        assert_eq!(users.get_member(&owner.id).await.unwrap(), None);

        users.edit_member(&owner.id, "hijack@example.com").await.unwrap();
        users.delete_member(&owner.id).await.unwrap();

        let stored = store.find_by_id(&owner.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "owner@example.com");
        assert_eq!(store.get_roles(&stored).await.unwrap(), roles(&[Role::SuperAdmin]));
    }

    #[tokio::test]
    async fn promote_swaps_user_for_admin() {
        let (store, users) = directory(Role::User);
        let account = users.add_member("promote@example.com", "Passw0rd!").await.unwrap();

        assert!(users.promote_to_admin(&account.id).await.unwrap());
        assert_eq!(store.get_roles(&account).await.unwrap(), roles(&[Role::Admin]));
        assert!(users.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn promote_unknown_id_changes_nothing() {
        let (store, users) = directory(Role::User);
        let account = users.add_member("stay@example.com", "Passw0rd!").await.unwrap();

        assert!(!users.promote_to_admin("unknown-id").await.unwrap());
        assert_eq!(store.get_roles(&account).await.unwrap(), roles(&[Role::User]));
        assert!(store.users_in_role(Role::Admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn promote_existing_admin_fails() {
        let (store, users) = directory(Role::User);
        let account = users.add_member("both@example.com", "Passw0rd!").await.unwrap();
        store.add_to_role(&account, Role::Admin).await.unwrap();

        assert!(!users.promote_to_admin(&account.id).await.unwrap());
        assert_eq!(store.get_roles(&account).await.unwrap(), roles(&[Role::User, Role::Admin]));
    }

    #[tokio::test]
    async fn promote_reports_success_when_previous_role_is_missing() {
        let (store, users) = directory(Role::User);
        let account = store.create("norole@example.com", "Passw0rd!").await.unwrap();

        assert!(users.promote_to_admin(&account.id).await.unwrap());
        assert_eq!(store.get_roles(&account).await.unwrap(), roles(&[Role::Admin]));
    }
}
