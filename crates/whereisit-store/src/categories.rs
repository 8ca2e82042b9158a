//! Category operations.

use sqlx::PgExecutor;
use whereisit_core::{CategoryChange, CategoryId, NewCategory};

use crate::Store;
use crate::error::{StoreError, StoreResult};
use crate::executor;
use crate::models::{CategoryRow, Inserted};
use crate::statement::{AuthorizedDelete, AuthorizedUpdate, KeyedTable};

impl Store {
    /// List all categories in storage order.
    pub async fn list_categories(&self) -> StoreResult<Vec<CategoryRow>> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            r#"SELECT category_id, category_name FROM categories ORDER BY category_id"#,
        )
        .fetch_all(self.pool())
        .await?)
    }

    /// Get a category by ID. `None` when it does not exist.
    pub async fn get_category(&self, id: CategoryId) -> StoreResult<Option<CategoryRow>> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            r#"SELECT category_id, category_name FROM categories WHERE category_id = $1"#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await?)
    }

    /// Insert a new category. Names are not unique.
    pub async fn insert_category(
        &self,
        category: &NewCategory,
    ) -> StoreResult<Inserted<CategoryId>> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO categories (category_name, secret_key)
            VALUES ($1, $2)
            RETURNING category_id
            "#,
        )
        .bind(&category.name)
        .bind(&category.secret_key)
        .fetch_one(self.pool())
        .await?;

        tracing::info!(category_id = id, "Category created");

        Ok(Inserted {
            id: CategoryId::new(id),
            rows_affected: 1,
        })
    }

    /// Rename a category, optionally rotating its secret key.
    ///
    /// Returns 1 on success and 0 when the category does not exist or the
    /// confirm key matches neither its secret key nor the administrator key.
    pub async fn update_category(&self, change: &CategoryChange) -> StoreResult<u64> {
        let decision = self
            .policy()
            .authorize_update(&change.confirm_key, change.replacement_key.as_deref());

        let statement = AuthorizedUpdate::new(KeyedTable::Categories, change.id.get())
            .set("category_name", change.name.as_str())
            .build(&decision);

        let updated = executor::execute(self.pool(), &statement).await?;

        tracing::info!(
            category_id = %change.id,
            admin = decision.is_admin(),
            key_rotated = decision.key_to_store().is_some(),
            updated,
            "Category update"
        );

        Ok(updated)
    }

    /// Whether any item is filed under the category.
    pub async fn category_has_items(&self, id: CategoryId) -> StoreResult<bool> {
        has_items(self.pool(), id).await
    }

    /// Delete a category that has no items.
    ///
    /// The category row is locked before the item check. Linking an item
    /// takes a key-share lock on the same row, so a concurrent link either
    /// commits first and is seen by the check, or waits and then fails its
    /// foreign key. Returns the number of rows deleted (0 or 1), or
    /// [`StoreError::CategoryInUse`] before the secret key is consulted.
    pub async fn delete_category(&self, id: CategoryId, confirm_key: &str) -> StoreResult<u64> {
        let mut tx = self.begin().await?;

        sqlx::query("SELECT 1 FROM categories WHERE category_id = $1 FOR UPDATE")
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await?;

        if has_items(&mut *tx, id).await? {
            tx.rollback().await?;
            tracing::info!(category_id = %id, "Refusing to delete category with items");
            return Err(StoreError::CategoryInUse(id));
        }

        let authorization = self.policy().authorize(confirm_key);
        let statement =
            AuthorizedDelete::new(KeyedTable::Categories, id.get()).build(&authorization);

        let deleted = executor::execute(&mut *tx, &statement).await?;
        tx.commit().await?;

        tracing::info!(
            category_id = %id,
            admin = authorization.is_admin(),
            deleted,
            "Category delete"
        );

        Ok(deleted)
    }
}

async fn has_items<'c, E>(executor: E, id: CategoryId) -> StoreResult<bool>
where
    E: PgExecutor<'c>,
{
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM item_categories WHERE category_id = $1)")
            .bind(id.get())
            .fetch_one(executor)
            .await?;
    Ok(exists)
}
