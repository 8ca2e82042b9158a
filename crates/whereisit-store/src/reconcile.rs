//! Category membership reconciliation.
//!
//! Makes the `item_categories` rows of one item exactly equal to a desired
//! set: rows whose category left the set are deleted, then every desired
//! pair is inserted with `ON CONFLICT DO NOTHING` so overlap with the
//! existing rows is harmless. Running the same sync twice changes nothing
//! the second time.
//!
//! A sync always runs on the caller's connection so it shares the item
//! mutation's transaction.

use std::collections::BTreeSet;

use sqlx::PgConnection;
use whereisit_core::{CategoryId, ItemId};

use crate::error::{StoreError, StoreResult};
use crate::executor;
use crate::models::Reconciled;
use crate::statement::Statement;

/// A planned reconciliation for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySync {
    item_id: ItemId,
    desired: BTreeSet<CategoryId>,
}

impl CategorySync {
    /// Plan a sync. Refuses an empty category set before any statement is
    /// built, so an item can never be left without categories.
    pub fn new(item_id: ItemId, desired: &[CategoryId]) -> StoreResult<Self> {
        if desired.is_empty() {
            return Err(StoreError::EmptyCategorySet);
        }
        Ok(Self {
            item_id,
            desired: desired.iter().copied().collect(),
        })
    }

    /// Retarget the plan at another item, e.g. one whose id was just generated.
    pub fn for_item(mut self, item_id: ItemId) -> Self {
        self.item_id = item_id;
        self
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// The deduplicated desired set.
    pub fn desired(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.desired.iter().copied()
    }

    fn desired_ids(&self) -> Vec<i32> {
        self.desired.iter().map(|id| id.get()).collect()
    }

    /// Delete links to categories outside the desired set.
    pub fn delete_statement(&self) -> Statement {
        Statement::new(
            "DELETE FROM item_categories \
             WHERE item_id = $1 AND category_id <> ALL($2::int[])",
        )
        .bind(self.item_id.get())
        .bind(self.desired_ids())
    }

    /// Insert every desired link, skipping ones that already exist.
    pub fn insert_statement(&self) -> Statement {
        Statement::new(
            "INSERT INTO item_categories (item_id, category_id) \
             SELECT $1, UNNEST($2::int[]) \
             ON CONFLICT (item_id, category_id) DO NOTHING",
        )
        .bind(self.item_id.get())
        .bind(self.desired_ids())
    }

    /// Run the delete then the insert on `conn`.
    pub async fn apply(&self, conn: &mut PgConnection) -> StoreResult<Reconciled> {
        let removed = executor::execute(&mut *conn, &self.delete_statement()).await?;
        let added = executor::execute(&mut *conn, &self.insert_statement())
            .await
            .map_err(StoreError::on_category_link)?;

        tracing::debug!(
            item_id = %self.item_id,
            desired = self.desired.len(),
            removed,
            added,
            "Reconciled item categories"
        );

        Ok(Reconciled { removed, added })
    }
}
