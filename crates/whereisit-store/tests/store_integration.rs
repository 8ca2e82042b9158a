//! Integration tests against a real PostgreSQL database.
//!
//! Run with:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p whereisit-store --features integration-tests
//! ```
//!
//! Every test creates its own categories and items, so tests can share a
//! database and run in parallel.

#![cfg(feature = "integration-tests")]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use whereisit_core::{
    AdminKey, CategoryChange, CategoryId, Contact, ItemChange, ItemId, ItemStatus, NewCategory,
    NewItem,
};
use whereisit_store::{Repository, Store, StoreConfig, StoreError};

const ADMIN_KEY: &str = "integration-admin";

async fn repository() -> Repository {
    let mut config = StoreConfig::from_env().expect("DATABASE_URL must be set");
    config.max_connections = 2;
    config.seed_demo_data = false;
    config.admin_key = AdminKey::new(ADMIN_KEY);
    Repository::new(Store::connect(config).await.expect("connect"))
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn category(repo: &Repository, key: &str) -> CategoryId {
    let inserted = repo
        .create_category(&NewCategory {
            name: unique("category"),
            secret_key: key.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(inserted.rows_affected, 1);
    inserted.id
}

fn new_item(categories: Vec<CategoryId>, key: &str) -> NewItem {
    NewItem {
        name: unique("item"),
        username: "ana_b".to_string(),
        details: Some("Left on the 42 bus".to_string()),
        contact: Contact::parse("+1 555 123 4567").unwrap(),
        status: ItemStatus::Found,
        categories,
        secret_key: key.to_string(),
    }
}

fn change(id: ItemId, categories: Vec<CategoryId>, confirm_key: &str) -> ItemChange {
    ItemChange {
        id,
        name: "Renamed".to_string(),
        username: "ana_b".to_string(),
        details: None,
        contact: Contact::parse("+15551234567").unwrap(),
        status: ItemStatus::Lost,
        categories,
        confirm_key: confirm_key.to_string(),
        replacement_key: None,
    }
}

async fn category_ids(repo: &Repository, id: ItemId) -> Vec<CategoryId> {
    let mut ids: Vec<_> = repo
        .get_item(id)
        .await
        .unwrap()
        .expect("item exists")
        .categories
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn end_to_end_lost_and_found() {
    let repo = repository().await;

    let inserted = repo
        .create_category(&NewCategory {
            name: "Electronics".to_string(),
            secret_key: "abc12".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(inserted.rows_affected, 1);
    let electronics = inserted.id;

    let mut backpack = new_item(vec![electronics], "xyz99");
    backpack.name = "Blue Backpack".to_string();
    let posted = repo.post_item(&backpack).await.unwrap();
    assert_eq!(posted.rows_affected, 1);

    let details = repo.get_item(posted.id).await.unwrap().unwrap();
    assert_eq!(details.item.name, "Blue Backpack");
    assert_eq!(details.item.contact, "+15551234567");
    assert_eq!(details.item.status, ItemStatus::Found);
    assert_eq!(details.categories.len(), 1);
    assert_eq!(details.categories[0].id, electronics);
    assert_eq!(details.categories[0].name, "Electronics");

    assert_eq!(repo.delete_item(posted.id, "xyz99").await.unwrap(), 1);
    assert!(repo.get_item(posted.id).await.unwrap().is_none());

    // The association row went with the item.
    assert!(!repo.store().category_has_items(electronics).await.unwrap());
    assert_eq!(repo.delete_category(electronics, "abc12").await.unwrap(), 1);
}

#[tokio::test]
async fn update_reconciles_categories_idempotently() {
    let repo = repository().await;
    let a = category(&repo, "k").await;
    let b = category(&repo, "k").await;
    let c = category(&repo, "k").await;

    let posted = repo.post_item(&new_item(vec![a, b], "owner")).await.unwrap();
    assert_eq!(category_ids(&repo, posted.id).await, vec![a, b]);

    let first = repo
        .update_item(&change(posted.id, vec![b, c], "owner"))
        .await
        .unwrap();
    assert_eq!(first.updated, 1);
    assert_eq!(first.categories.removed, 1);
    assert_eq!(first.categories.added, 1);
    assert_eq!(first.rows_affected(), 3);
    assert_eq!(category_ids(&repo, posted.id).await, vec![b, c]);

    let second = repo
        .update_item(&change(posted.id, vec![c, b, c], "owner"))
        .await
        .unwrap();
    assert_eq!(second.rows_affected(), 1);
    assert_eq!(category_ids(&repo, posted.id).await, vec![b, c]);

    let details = repo.get_item(posted.id).await.unwrap().unwrap();
    assert_eq!(details.item.name, "Renamed");
    assert_eq!(details.item.status, ItemStatus::Lost);
    assert_eq!(details.item.details, None);
}

#[tokio::test]
async fn admin_key_bypasses_item_secret() {
    let repo = repository().await;
    let cat = category(&repo, "k").await;
    let posted = repo.post_item(&new_item(vec![cat], "owner-key")).await.unwrap();

    let wrong = repo
        .update_item(&change(posted.id, vec![cat], "guess"))
        .await
        .unwrap();
    assert_eq!(wrong.rows_affected(), 0);

    let owner = repo
        .update_item(&change(posted.id, vec![cat], "owner-key"))
        .await
        .unwrap();
    assert!(owner.applied());

    let admin = repo
        .update_item(&change(posted.id, vec![cat], ADMIN_KEY))
        .await
        .unwrap();
    assert!(admin.applied());

    // The admin update kept the owner's key.
    assert_eq!(repo.delete_item(posted.id, "guess").await.unwrap(), 0);
    assert_eq!(repo.delete_item(posted.id, "owner-key").await.unwrap(), 1);
}

#[tokio::test]
async fn rejected_update_leaves_categories_alone() {
    let repo = repository().await;
    let a = category(&repo, "k").await;
    let b = category(&repo, "k").await;
    let posted = repo.post_item(&new_item(vec![a], "owner")).await.unwrap();

    let outcome = repo
        .update_item(&change(posted.id, vec![b], "wrong"))
        .await
        .unwrap();
    assert_eq!(outcome.rows_affected(), 0);
    assert_eq!(category_ids(&repo, posted.id).await, vec![a]);
}

#[tokio::test]
async fn replacement_key_rotates_category_key() {
    let repo = repository().await;
    let id = category(&repo, "old-key").await;

    let blank = repo
        .update_category(&CategoryChange {
            id,
            name: "Wallets".to_string(),
            confirm_key: "old-key".to_string(),
            replacement_key: Some("   ".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(blank, 1);

    let rotated = repo
        .update_category(&CategoryChange {
            id,
            name: "Wallets".to_string(),
            confirm_key: "old-key".to_string(),
            replacement_key: Some("new-key".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(rotated, 1);

    let with_old = repo
        .update_category(&CategoryChange {
            id,
            name: "Purses".to_string(),
            confirm_key: "old-key".to_string(),
            replacement_key: None,
        })
        .await
        .unwrap();
    assert_eq!(with_old, 0);

    let with_new = repo
        .update_category(&CategoryChange {
            id,
            name: "Purses".to_string(),
            confirm_key: "new-key".to_string(),
            replacement_key: None,
        })
        .await
        .unwrap();
    assert_eq!(with_new, 1);

    let stored = repo.get_category(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Purses");
}

#[tokio::test]
async fn replacement_key_rotates_item_key() {
    let repo = repository().await;
    let cat = category(&repo, "k").await;
    let id = repo.post_item(&new_item(vec![cat], "owner")).await.unwrap().id;

    let mut blank = change(id, vec![cat], "owner");
    blank.replacement_key = Some("  ".to_string());
    assert_eq!(repo.update_item(&blank).await.unwrap().updated, 1);

    let mut rotated = change(id, vec![cat], ADMIN_KEY);
    rotated.replacement_key = Some("new-owner".to_string());
    assert_eq!(repo.update_item(&rotated).await.unwrap().updated, 1);

    let with_old = repo.update_item(&change(id, vec![cat], "owner")).await.unwrap();
    assert_eq!(with_old.rows_affected(), 0);
    assert_eq!(repo.delete_item(id, "owner").await.unwrap(), 0);

    let with_new = repo.update_item(&change(id, vec![cat], "new-owner")).await.unwrap();
    assert_eq!(with_new.updated, 1);
    assert_eq!(repo.delete_item(id, "new-owner").await.unwrap(), 1);
}

#[tokio::test]
async fn category_with_items_cannot_be_deleted() {
    let repo = repository().await;
    let used = category(&repo, "k").await;
    let empty = category(&repo, "k").await;
    repo.post_item(&new_item(vec![used], "owner")).await.unwrap();

    let refused = repo.delete_category(used, ADMIN_KEY).await;
    assert!(matches!(refused, Err(StoreError::CategoryInUse(id)) if id == used));
    assert!(repo.get_category(used).await.unwrap().is_some());

    assert_eq!(repo.delete_category(empty, "wrong").await.unwrap(), 0);
    assert_eq!(repo.delete_category(empty, "k").await.unwrap(), 1);
    assert!(repo.get_category(empty).await.unwrap().is_none());
}

#[tokio::test]
async fn category_delete_waits_for_pending_item_link() {
    let repo = repository().await;
    let first = category(&repo, "k").await;
    let second = category(&repo, "k").await;
    let posted = repo.post_item(&new_item(vec![first], "owner")).await.unwrap();

    // Re-file the item under the second category without committing yet.
    let mut tx = repo.store().pool().begin().await.unwrap();
    sqlx::query("DELETE FROM item_categories WHERE item_id = $1")
        .bind(posted.id.get())
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("INSERT INTO item_categories (item_id, category_id) VALUES ($1, $2)")
        .bind(posted.id.get())
        .bind(second.get())
        .execute(&mut *tx)
        .await
        .unwrap();

    let deleting = {
        let repo = repo.clone();
        tokio::spawn(async move { repo.delete_category(second, "k").await })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!deleting.is_finished(), "delete must wait for the pending link");

    tx.commit().await.unwrap();

    let result = deleting.await.unwrap();
    assert!(matches!(result, Err(StoreError::CategoryInUse(id)) if id == second));
    assert_eq!(category_ids(&repo, posted.id).await, vec![second]);
    assert!(repo.get_category(second).await.unwrap().is_some());
}

#[tokio::test]
async fn empty_category_set_is_rejected_by_store() {
    let repo = repository().await;
    let cat = category(&repo, "k").await;
    let posted = repo.post_item(&new_item(vec![cat], "owner")).await.unwrap();

    let result = repo.update_item(&change(posted.id, vec![], "owner")).await;
    assert!(matches!(result, Err(StoreError::EmptyCategorySet)));
    assert_eq!(category_ids(&repo, posted.id).await, vec![cat]);

    let insert = repo.post_item(&new_item(vec![], "owner")).await;
    assert!(matches!(insert, Err(StoreError::EmptyCategorySet)));
}

#[tokio::test]
async fn unknown_category_rolls_back_insert() {
    let repo = repository().await;
    let item = new_item(vec![CategoryId::new(i32::MAX)], "owner");
    let name = item.name.clone();

    let result = repo.post_item(&item).await;
    assert!(matches!(result, Err(StoreError::UnknownCategory)));

    let items = repo.list_items().await.unwrap();
    assert!(items.iter().all(|i| i.name != name));
}

#[tokio::test]
async fn unknown_category_rolls_back_update() {
    let repo = repository().await;
    let cat = category(&repo, "k").await;
    let posted = repo.post_item(&new_item(vec![cat], "owner")).await.unwrap();

    let result = repo
        .update_item(&change(posted.id, vec![CategoryId::new(i32::MAX)], "owner"))
        .await;
    assert!(matches!(result, Err(StoreError::UnknownCategory)));

    let item = repo.get_item(posted.id).await.unwrap().unwrap();
    assert_ne!(item.item.name, "Renamed");
    assert_eq!(category_ids(&repo, posted.id).await, vec![cat]);
}

#[tokio::test]
async fn items_in_category_carry_category_name() {
    let repo = repository().await;
    let cat = category(&repo, "k").await;
    let name = repo.get_category(cat).await.unwrap().unwrap().name;
    let posted = repo.post_item(&new_item(vec![cat], "owner")).await.unwrap();

    let listed = repo.items_in_category(cat).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].item.id, posted.id);
    assert_eq!(listed[0].category_name, name);
}

#[tokio::test]
async fn missing_records_are_none_or_zero() {
    let repo = repository().await;
    let missing_item = ItemId::new(i32::MAX);
    let missing_category = CategoryId::new(i32::MAX);

    assert!(repo.get_item(missing_item).await.unwrap().is_none());
    assert!(repo.get_category(missing_category).await.unwrap().is_none());
    assert_eq!(repo.delete_item(missing_item, ADMIN_KEY).await.unwrap(), 0);
    assert_eq!(
        repo.update_item(&change(missing_item, vec![missing_category], ADMIN_KEY))
            .await
            .unwrap()
            .rows_affected(),
        0
    );
}
