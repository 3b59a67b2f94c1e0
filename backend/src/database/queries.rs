//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations, providing reusable
//! functions for interacting with the database and abstracting the query logic
//! from higher-level services and API handlers.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::Product;

pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT id, name, price FROM products ORDER BY seq")
        .fetch_all(pool)
        .await
}

pub async fn find_product(pool: &SqlitePool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
}

pub async fn insert_product(pool: &SqlitePool, product: &Product) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO products (id, name, price) VALUES (?, ?, ?)")
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.price)
        .execute(pool)
        .await?;
    Ok(())
}

/// Returns the number of rows changed (0 when the id is unknown).
pub async fn update_product(pool: &SqlitePool, product: &Product) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE products SET name = ?, price = ? WHERE id = ?")
        .bind(&product.name)
        .bind(product.price)
        .bind(product.id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Returns the number of rows removed (0 when the id is unknown).
pub async fn delete_product(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
