//! Schema definitions, migration and demo seeding.
//!
//! This module provides the embedded SQL schema and utilities
//! for creating it and for populating an empty board.

use sqlx::PgPool;
use whereisit_core::AdminKey;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the core schema (001_schema.sql).
pub const SCHEMA_MIGRATION: &str = include_str!("../../../migrations/001_schema.sql");

/// Categories created by [`seed_demo_data`].
const DEMO_CATEGORIES: [&str; 3] = ["Laptop", "Money", "Gold"];

/// Items created by [`seed_demo_data`]: name, details, status, category.
const DEMO_ITEMS: [(&str, &str, i32, &str); 3] = [
    ("Ring", "I found this item at the bus station.", 1, "Gold"),
    ("Dell laptop", "I lost my laptop at the cafe.", 0, "Laptop"),
    ("100 USD", "I found $100 at the school.", 1, "Money"),
];

const DEMO_USERNAME: &str = "baklick";
const DEMO_CONTACT: &str = "+12834567890";

/// Run the schema migration against the database.
///
/// This function is idempotent - it can be run multiple times safely.
/// Every statement checks for existing objects before creating them.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running schema migration (001_schema.sql)...");
    sqlx::raw_sql(SCHEMA_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Schema migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Populate an empty board with a few categories and items.
///
/// All demo records are owned by the administrator key. Does nothing when
/// any category already exists. Returns whether data was inserted.
pub async fn seed_demo_data(pool: &PgPool, admin_key: &AdminKey) -> StoreResult<bool> {
    let mut tx = pool.begin().await?;

    let (has_categories,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM categories)")
            .fetch_one(&mut *tx)
            .await?;
    if has_categories {
        tracing::info!("Board already has categories, skipping demo seed");
        return Ok(false);
    }

    for name in DEMO_CATEGORIES {
        sqlx::query("INSERT INTO categories (category_name, secret_key) VALUES ($1, $2)")
            .bind(name)
            .bind(admin_key.expose())
            .execute(&mut *tx)
            .await?;
    }

    for (name, details, status, category) in DEMO_ITEMS {
        let item_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO items (item_name, username, details, contact, status, secret_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING item_id
            "#,
        )
        .bind(name)
        .bind(DEMO_USERNAME)
        .bind(details)
        .bind(DEMO_CONTACT)
        .bind(status)
        .bind(admin_key.expose())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO item_categories (item_id, category_id)
            SELECT $1, category_id FROM categories WHERE category_name = $2
            "#,
        )
        .bind(item_id)
        .bind(category)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        categories = DEMO_CATEGORIES.len(),
        items = DEMO_ITEMS.len(),
        "Seeded demo data"
    );
    Ok(true)
}
