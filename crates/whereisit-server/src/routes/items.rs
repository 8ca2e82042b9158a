//! Item routes.
//!
//! - GET /items - List items (without categories)
//! - POST /items - Post a lost or found item
//! - GET /items/{id} - Fetch an item with its categories
//! - PUT /items/{id} - Edit an item and replace its category set
//! - DELETE /items/{id} - Delete an item

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use whereisit_core::{CategoryId, Item, ItemChange, ItemDetails, ItemId, NewItem};

use crate::error::{ApiError, ApiResult};
use crate::routes::ConfirmKeyRequest;
use crate::state::AppState;
use crate::validate;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for GET /items.
#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<Item>,
}

/// Request body for POST /items.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub details: Option<String>,
    /// Phone-style contact; normalized before storage.
    pub contact: String,
    /// 0 = lost, 1 = found.
    pub status: i32,
    pub categories: Vec<CategoryId>,
    pub secret_key: String,
}

/// Request body for PUT /items/{id}.
///
/// Every field is assigned; `categories` is the full desired set.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub details: Option<String>,
    pub contact: String,
    pub status: i32,
    pub categories: Vec<CategoryId>,
    pub confirm_key: String,
    #[serde(default)]
    pub new_secret_key: Option<String>,
}

/// Response for POST and DELETE on items.
#[derive(Debug, Serialize)]
pub struct ItemMutationResponse {
    pub id: ItemId,
    pub rows_affected: u64,
}

/// Response for PUT /items/{id}.
#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub id: ItemId,
    /// Item row plus every association row removed or added.
    pub rows_affected: u64,
    pub categories_removed: u64,
    pub categories_added: u64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /items - List every item.
async fn list_items(State(state): State<AppState>) -> ApiResult<Json<ListItemsResponse>> {
    let items = state.repo().list_items().await?;
    Ok(Json(ListItemsResponse { items }))
}

/// POST /items - Post an item.
///
/// # Response
///
/// - 201 Created: `{ "id": 12, "rows_affected": 1 }`
/// - 400 Bad Request: invalid field, no categories
async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemMutationResponse>)> {
    let item = NewItem {
        name: validate::required_text("name", &request.name, validate::MAX_NAME_LEN)?,
        username: validate::required_text(
            "username",
            &request.username,
            validate::MAX_USERNAME_LEN,
        )?,
        details: validate::optional_text(request.details.as_deref()),
        contact: validate::contact(&request.contact)?,
        status: validate::status(request.status)?,
        categories: validate::categories(&request.categories)?,
        secret_key: validate::required_key("secret_key", &request.secret_key)?,
    };

    let inserted = state.repo().post_item(&item).await?;

    tracing::info!(
        item_id = %inserted.id,
        status = %item.status,
        categories = item.categories.len(),
        "Item posted"
    );

    Ok((
        StatusCode::CREATED,
        Json(ItemMutationResponse {
            id: inserted.id,
            rows_affected: inserted.rows_affected,
        }),
    ))
}

/// GET /items/{id} - Fetch an item with its categories.
async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> ApiResult<Json<ItemDetails>> {
    state
        .repo()
        .get_item(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("item {} not found", id)))
}

/// PUT /items/{id} - Edit an item.
///
/// # Response
///
/// - 200 OK: counts of the item row and association rows touched
/// - 400 Bad Request: invalid field, no categories
/// - 403 Forbidden: no such item or key mismatch; categories untouched
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(request): Json<UpdateItemRequest>,
) -> ApiResult<Json<UpdateItemResponse>> {
    let change = ItemChange {
        id,
        name: validate::required_text("name", &request.name, validate::MAX_NAME_LEN)?,
        username: validate::required_text(
            "username",
            &request.username,
            validate::MAX_USERNAME_LEN,
        )?,
        details: validate::optional_text(request.details.as_deref()),
        contact: validate::contact(&request.contact)?,
        status: validate::status(request.status)?,
        categories: validate::categories(&request.categories)?,
        confirm_key: validate::required_key("confirm_key", &request.confirm_key)?,
        replacement_key: validate::replacement_key("new_secret_key", request.new_secret_key)?,
    };

    let outcome = state.repo().update_item(&change).await?;
    if !outcome.applied() {
        return Err(ApiError::not_found_or_key_mismatch());
    }

    Ok(Json(UpdateItemResponse {
        id,
        rows_affected: outcome.rows_affected(),
        categories_removed: outcome.categories.removed,
        categories_added: outcome.categories.added,
    }))
}

/// DELETE /items/{id} - Delete an item and its category links.
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(request): Json<ConfirmKeyRequest>,
) -> ApiResult<Json<ItemMutationResponse>> {
    let confirm_key = validate::required_key("confirm_key", &request.confirm_key)?;

    let rows_affected = state.repo().delete_item(id, &confirm_key).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found_or_key_mismatch());
    }

    Ok(Json(ItemMutationResponse { id, rows_affected }))
}

/// Build item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{
            "name": "Blue Backpack",
            "username": "ana_b",
            "contact": "+1 555 123 4567",
            "status": 1,
            "categories": [1],
            "secret_key": "xyz99"
        }"#;
        let request: CreateItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Blue Backpack");
        assert!(request.details.is_none());
        assert_eq!(request.categories, vec![CategoryId::new(1)]);
    }

    #[test]
    fn test_update_request_requires_categories_field() {
        let json = r#"{
            "name": "Ring",
            "username": "baklick",
            "contact": "+12834567890",
            "status": 0,
            "confirm_key": "k"
        }"#;
        assert!(serde_json::from_str::<UpdateItemRequest>(json).is_err());
    }

    #[test]
    fn test_update_response_serialize() {
        let response = UpdateItemResponse {
            id: ItemId::new(12),
            rows_affected: 3,
            categories_removed: 1,
            categories_added: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 12);
        assert_eq!(json["rows_affected"], 3);
        assert_eq!(json["categories_removed"], 1);
    }
}
