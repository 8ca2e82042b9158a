//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for
//! sqlx queries. They are separate from the domain types in
//! whereisit-core; the repository converts between the two.
//! No row type selects `secret_key`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use whereisit_core::{Category, CategoryId, Item, ItemId, ItemStatus};

use crate::error::StoreResult;

/// Database row for the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CategoryRow {
    pub category_id: i32,
    pub category_name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.category_id),
            name: row.category_name,
        }
    }
}

/// Database row for the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub item_id: i32,
    pub item_name: String,
    pub username: String,
    pub details: Option<String>,
    pub contact: String,
    pub added: DateTime<Utc>,
    /// 0 = lost, 1 = found (enforced by a CHECK constraint)
    pub status: i32,
}

impl ItemRow {
    /// Convert to the domain type, decoding the status code.
    pub fn into_item(self) -> StoreResult<Item> {
        Ok(Item {
            id: ItemId::new(self.item_id),
            name: self.item_name,
            username: self.username,
            details: self.details,
            contact: self.contact,
            added: self.added,
            status: ItemStatus::try_from(self.status)?,
        })
    }
}

/// An item row joined to one of its categories.
#[derive(Debug, Clone, FromRow)]
pub struct CategorizedItemRow {
    #[sqlx(flatten)]
    pub item: ItemRow,
    pub category_name: String,
}

/// An item row with its categories loaded.
#[derive(Debug, Clone)]
pub struct ItemWithCategories {
    pub item: ItemRow,
    pub categories: Vec<CategoryRow>,
}

/// Result of an insert: the generated identifier and the row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted<I> {
    pub id: I,
    pub rows_affected: u64,
}

/// Association rows changed by a reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Rows deleted because their category left the desired set.
    pub removed: u64,
    /// Rows inserted for categories not previously linked.
    pub added: u64,
}

/// Outcome of an item update.
///
/// A rejected update (wrong key or missing item) has every count at zero
/// and left the association rows untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemUpdateOutcome {
    /// Item rows updated (0 or 1).
    pub updated: u64,
    /// Category associations changed alongside the update.
    pub categories: Reconciled,
}

impl ItemUpdateOutcome {
    /// Combined count: rows updated plus associations removed and added.
    pub fn rows_affected(&self) -> u64 {
        self.updated + self.categories.removed + self.categories.added
    }

    /// Whether the update was authorized and applied.
    pub fn applied(&self) -> bool {
        self.updated > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_row(status: i32) -> ItemRow {
        ItemRow {
            item_id: 5,
            item_name: "Blue Backpack".to_string(),
            username: "ana_b".to_string(),
            details: None,
            contact: "+15551234567".to_string(),
            added: Utc::now(),
            status,
        }
    }

    #[test]
    fn item_row_decodes_status() {
        let item = item_row(1).into_item().unwrap();
        assert_eq!(item.id, ItemId::new(5));
        assert_eq!(item.status, ItemStatus::Found);
    }

    #[test]
    fn item_row_rejects_unknown_status() {
        assert!(item_row(3).into_item().is_err());
    }

    #[test]
    fn update_outcome_sums_counts() {
        let outcome = ItemUpdateOutcome {
            updated: 1,
            categories: Reconciled {
                removed: 2,
                added: 1,
            },
        };
        assert_eq!(outcome.rows_affected(), 4);
        assert!(outcome.applied());
        assert_eq!(ItemUpdateOutcome::default().rows_affected(), 0);
        assert!(!ItemUpdateOutcome::default().applied());
    }
}
