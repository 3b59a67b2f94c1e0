//! Main entry point for the product management backend.
//!
//! This file initializes logging and configuration, opens the database,
//! prepares the identity store and serves the router until Ctrl-C.

use std::sync::Arc;

use adapters::{IdentityStore, PasswordHasher, SqliteIdentityStore};
use backend::{build_app, config::AppConfig, database, logging, services::seed_super_admin};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = AppConfig::load()?;
    info!(address = %config.bind_address(), database = %config.database.url, "configuration loaded");

    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    let hasher = PasswordHasher::new(config.password.argon2(), config.password.policy.clone())?;
    let store = SqliteIdentityStore::new(pool.clone(), hasher);
    store.migrate().await?;
    let identity: Arc<dyn IdentityStore> = Arc::new(store);

    if seed_super_admin(identity.as_ref(), &config.seed).await? {
        info!("bootstrap super admin created");
    }

    let app = build_app(identity, pool, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
