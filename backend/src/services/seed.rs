//! Startup seeding of the bootstrap SuperAdmin account.

use adapters::{IdentityStore, Role};
use tracing::{info, instrument};

use crate::config::SeedConfig;
use crate::errors::Result;

/// Creates the configured SuperAdmin unless an account with that email
/// already exists. Does nothing when seeding is not configured.
///
/// Returns whether an account was created.
#[instrument(skip_all)]
pub async fn seed_super_admin(identity: &dyn IdentityStore, seed: &SeedConfig) -> Result<bool> {
    let (Some(email), Some(password)) = (&seed.super_admin_email, &seed.super_admin_password) else {
        return Ok(false);
    };

    if let Some(existing) = identity.find_by_email(email).await? {
        info!(account_id = %existing.id, "super admin already present");
        return Ok(false);
    }

    let account = identity.create(email, password).await?;
    if let Err(err) = identity.add_to_role(&account, Role::SuperAdmin).await {
        identity.delete(&account).await?;
        return Err(err.into());
    }

    info!(account_id = %account.id, "seeded super admin");
    Ok(true)
}
