//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the SQLite connection pool
//! and creating the schema owned by the backend (products). Identity tables
//! are created by the identity store itself.

pub mod models;
pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

const SCHEMA: [&str; 1] = ["CREATE TABLE IF NOT EXISTS products (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    price INTEGER
)"];

/// Opens the pool described by `config`, creating the database file if needed.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Each in-memory connection would otherwise see its own empty database.
    let max_connections = if config.url.contains(":memory:") {
        1
    } else {
        config.max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(url = %config.url, max_connections, "database pool ready");
    Ok(pool)
}

/// Creates the backend tables if they do not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("product schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_migrates_twice() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 8,
        };
        let pool = connect(&config).await.unwrap();
        migrate(&pool).await.unwrap();
        migrate(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
