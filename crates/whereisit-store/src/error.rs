//! Error types for the storage layer.
//!
//! Missing records and wrong secret keys are not errors here: reads return
//! `None` and mutations return a zero row count. Only broken preconditions
//! and storage failures surface as [`StoreError`].

use thiserror::Error;
use whereisit_core::{CategoryId, InvalidStatus};

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error, passed through unchanged.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Category still has items filed under it and cannot be deleted.
    #[error("category {0} still has items")]
    CategoryInUse(CategoryId),

    /// An item must belong to at least one category.
    #[error("an item must belong to at least one category")]
    EmptyCategorySet,

    /// An item was filed under a category that does not exist.
    #[error("a chosen category does not exist")]
    UnknownCategory,

    /// A stored status is outside the lost/found codes.
    #[error("corrupt item row: {0}")]
    InvalidStatus(#[from] InvalidStatus),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Whether this error is a precondition the caller should have checked,
    /// as opposed to a storage failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::CategoryInUse(_) | Self::EmptyCategorySet | Self::UnknownCategory
        )
    }

    /// Reclassify a foreign-key failure while linking an item to its
    /// categories. The item row is always present at that point, so the
    /// missing side is a category.
    pub(crate) fn on_category_link(self) -> Self {
        match self {
            Self::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Self::UnknownCategory
            }
            other => other,
        }
    }
}
