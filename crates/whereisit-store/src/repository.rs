//! Repository layer providing domain-typed interfaces to the storage layer.
//!
//! This module wraps the raw Store operations with whereisit-core types,
//! converting database rows into domain types for application code.
//!
//! Mutations still report plain row counts: zero means the record is
//! missing or the confirm key was wrong, and the two are not told apart.

use whereisit_core::{
    CategorizedItem, Category, CategoryChange, CategoryId, Item, ItemChange, ItemDetails, ItemId,
    NewCategory, NewItem,
};

use crate::Store;
use crate::error::StoreResult;
use crate::models::{Inserted, ItemUpdateOutcome};

/// Repository providing domain-typed access to the store.
#[derive(Debug, Clone)]
pub struct Repository {
    store: Store,
}

impl Repository {
    /// Create a new repository wrapping the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // ========================================================================
    // Category Operations
    // ========================================================================

    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = self.store.list_categories().await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.store.get_category(id).await?.map(Category::from))
    }

    pub async fn create_category(
        &self,
        category: &NewCategory,
    ) -> StoreResult<Inserted<CategoryId>> {
        self.store.insert_category(category).await
    }

    pub async fn update_category(&self, change: &CategoryChange) -> StoreResult<u64> {
        self.store.update_category(change).await
    }

    /// Delete a category that has no items.
    ///
    /// Refuses with [`StoreError::CategoryInUse`](crate::StoreError::CategoryInUse)
    /// while any item is filed under it, before the secret key is even checked.
    pub async fn delete_category(&self, id: CategoryId, confirm_key: &str) -> StoreResult<u64> {
        self.store.delete_category(id, confirm_key).await
    }

    // ========================================================================
    // Item Operations
    // ========================================================================

    pub async fn list_items(&self) -> StoreResult<Vec<Item>> {
        self.store
            .list_items()
            .await?
            .into_iter()
            .map(|row| row.into_item())
            .collect()
    }

    /// Get an item with its categories.
    pub async fn get_item(&self, id: ItemId) -> StoreResult<Option<ItemDetails>> {
        let Some(found) = self.store.get_item(id).await? else {
            return Ok(None);
        };

        Ok(Some(ItemDetails {
            item: found.item.into_item()?,
            categories: found.categories.into_iter().map(Category::from).collect(),
        }))
    }

    /// Items filed under a category. Empty when the category has no items
    /// or does not exist.
    pub async fn items_in_category(&self, id: CategoryId) -> StoreResult<Vec<CategorizedItem>> {
        self.store
            .items_in_category(id)
            .await?
            .into_iter()
            .map(|row| {
                Ok(CategorizedItem {
                    item: row.item.into_item()?,
                    category_name: row.category_name,
                })
            })
            .collect()
    }

    pub async fn post_item(&self, item: &NewItem) -> StoreResult<Inserted<ItemId>> {
        self.store.insert_item(item).await
    }

    pub async fn update_item(&self, change: &ItemChange) -> StoreResult<ItemUpdateOutcome> {
        self.store.update_item(change).await
    }

    pub async fn delete_item(&self, id: ItemId, confirm_key: &str) -> StoreResult<u64> {
        self.store.delete_item(id, confirm_key).await
    }
}
