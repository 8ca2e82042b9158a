//! Item operations.
//!
//! Inserts and updates touch both `items` and `item_categories`, so each
//! runs in one transaction: the item row and its category links are
//! written together or not at all.

use whereisit_core::{CategoryId, ItemChange, ItemId, NewItem};

use crate::Store;
use crate::error::StoreResult;
use crate::executor;
use crate::models::{
    CategorizedItemRow, CategoryRow, Inserted, ItemRow, ItemUpdateOutcome, ItemWithCategories,
};
use crate::reconcile::CategorySync;
use crate::statement::{AuthorizedDelete, AuthorizedUpdate, KeyedTable};

impl Store {
    /// List all items, without their categories.
    pub async fn list_items(&self) -> StoreResult<Vec<ItemRow>> {
        Ok(sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT item_id, item_name, username, details, contact, added, status
            FROM items
            ORDER BY item_id
            "#,
        )
        .fetch_all(self.pool())
        .await?)
    }

    /// Get an item with its categories. `None` when it does not exist, in
    /// which case no category lookup is made.
    pub async fn get_item(&self, id: ItemId) -> StoreResult<Option<ItemWithCategories>> {
        let item = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT item_id, item_name, username, details, contact, added, status
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?;

        let Some(item) = item else {
            return Ok(None);
        };

        let categories = self.categories_for_item(id).await?;
        Ok(Some(ItemWithCategories { item, categories }))
    }

    /// Categories an item is filed under.
    pub async fn categories_for_item(&self, id: ItemId) -> StoreResult<Vec<CategoryRow>> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT c.category_id, c.category_name
            FROM categories c
            JOIN item_categories ic ON ic.category_id = c.category_id
            WHERE ic.item_id = $1
            "#,
        )
        .bind(id.get())
        .fetch_all(self.pool())
        .await?)
    }

    /// Items filed under a category, each carrying the category's name.
    pub async fn items_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Vec<CategorizedItemRow>> {
        Ok(sqlx::query_as::<_, CategorizedItemRow>(
            r#"
            SELECT i.item_id, i.item_name, i.username, i.details, i.contact,
                   i.added, i.status, c.category_name
            FROM items i
            JOIN item_categories ic ON ic.item_id = i.item_id
            JOIN categories c ON c.category_id = ic.category_id
            WHERE c.category_id = $1
            ORDER BY i.item_id
            "#,
        )
        .bind(category_id.get())
        .fetch_all(self.pool())
        .await?)
    }

    /// Insert an item and link it to its categories.
    ///
    /// Fails with `EmptyCategorySet` before touching the database when no
    /// category is given. An unknown category id fails the foreign key and
    /// rolls the item back.
    pub async fn insert_item(&self, item: &NewItem) -> StoreResult<Inserted<ItemId>> {
        let sync = CategorySync::new(ItemId::new(0), &item.categories)?;

        let mut tx = self.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO items (item_name, username, contact, status, details, secret_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING item_id
            "#,
        )
        .bind(&item.name)
        .bind(&item.username)
        .bind(item.contact.as_str())
        .bind(item.status.code())
        .bind(&item.details)
        .bind(&item.secret_key)
        .fetch_one(&mut *tx)
        .await?;

        let id = ItemId::new(id);
        let reconciled = sync.for_item(id).apply(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(
            item_id = %id,
            categories = reconciled.added,
            "Item created"
        );

        Ok(Inserted {
            id,
            rows_affected: 1,
        })
    }

    /// Update every column of an item and reconcile its categories.
    ///
    /// When the item is missing or the key does not match, the transaction
    /// is rolled back without touching the category links and every count
    /// in the outcome is zero.
    pub async fn update_item(&self, change: &ItemChange) -> StoreResult<ItemUpdateOutcome> {
        let sync = CategorySync::new(change.id, &change.categories)?;

        let decision = self
            .policy()
            .authorize_update(&change.confirm_key, change.replacement_key.as_deref());

        let statement = AuthorizedUpdate::new(KeyedTable::Items, change.id.get())
            .set("item_name", change.name.as_str())
            .set("username", change.username.as_str())
            .set("contact", change.contact.as_str())
            .set("status", change.status.code())
            .set("details", change.details.clone())
            .build(&decision);

        let mut tx = self.begin().await?;

        let updated = executor::execute(&mut *tx, &statement).await?;
        if updated == 0 {
            tx.rollback().await?;
            tracing::info!(
                item_id = %change.id,
                admin = decision.is_admin(),
                "Item update rejected: not found or key mismatch"
            );
            return Ok(ItemUpdateOutcome::default());
        }

        let categories = sync.apply(&mut *tx).await?;
        tx.commit().await?;

        let outcome = ItemUpdateOutcome {
            updated,
            categories,
        };

        tracing::info!(
            item_id = %change.id,
            admin = decision.is_admin(),
            key_rotated = decision.key_to_store().is_some(),
            rows_affected = outcome.rows_affected(),
            "Item updated"
        );

        Ok(outcome)
    }

    /// Delete an item. Its category links go with it via `ON DELETE CASCADE`.
    pub async fn delete_item(&self, id: ItemId, confirm_key: &str) -> StoreResult<u64> {
        let authorization = self.policy().authorize(confirm_key);
        let statement = AuthorizedDelete::new(KeyedTable::Items, id.get()).build(&authorization);

        let deleted = executor::execute(self.pool(), &statement).await?;

        tracing::info!(
            item_id = %id,
            admin = authorization.is_admin(),
            deleted,
            "Item delete"
        );

        Ok(deleted)
    }
}
