//! whereisit-store: Storage layer for the WhereIsIt lost-and-found board
//!
//! This crate provides:
//! - PostgreSQL storage for categories, items and their associations
//! - Secret-key authorized updates and deletes (owner key or admin key)
//! - Transactional reconciliation of an item's category set
//! - Migration management and demo seeding
//!
//! # Usage
//!
//! ```rust,ignore
//! use whereisit_store::{Repository, Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let repo = Repository::new(Store::connect(config).await?);
//!
//! let categories = repo.list_categories().await?;
//! let updated = repo.update_category(&change).await?;
//! if updated == 0 {
//!     // missing category or wrong key
//! }
//! ```

mod categories;
mod items;

pub mod error;
pub mod executor;
pub mod models;
pub mod reconcile;
pub mod repository;
pub mod schema;
pub mod statement;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use reconcile::CategorySync;
pub use repository::Repository;
pub use store::{Store, StoreConfig};

// Re-export whereisit-core for downstream crates
pub use whereisit_core;
