//! Category routes.
//!
//! - GET / and GET /categories - List categories (home page)
//! - POST /categories - Create a category
//! - GET /categories/{id} - Fetch one category
//! - PUT /categories/{id} - Rename a category, optionally rotating its key
//! - DELETE /categories/{id} - Delete a category that has no items
//! - GET /categories/{id}/items - Items filed under a category

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use whereisit_core::{CategorizedItem, Category, CategoryChange, CategoryId, NewCategory};

use crate::error::{ApiError, ApiResult};
use crate::routes::ConfirmKeyRequest;
use crate::state::AppState;
use crate::validate;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for GET /categories.
#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
}

/// Request body for POST /categories.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Key required for later edits and deletion.
    pub secret_key: String,
}

/// Request body for PUT /categories/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    /// Current secret key, or the administrator key.
    pub confirm_key: String,
    /// Replaces the stored key when non-blank.
    #[serde(default)]
    pub new_secret_key: Option<String>,
}

/// Response for category mutations.
#[derive(Debug, Serialize)]
pub struct CategoryMutationResponse {
    pub id: CategoryId,
    pub rows_affected: u64,
}

/// Response for GET /categories/{id}/items.
#[derive(Debug, Serialize)]
pub struct CategoryItemsResponse {
    pub category_id: CategoryId,
    pub items: Vec<CategorizedItem>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /categories - List every category.
async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<ListCategoriesResponse>> {
    let categories = state.repo().list_categories().await?;
    Ok(Json(ListCategoriesResponse { categories }))
}

/// POST /categories - Create a category.
///
/// # Response
///
/// - 201 Created: `{ "id": 4, "rows_affected": 1 }`
/// - 400 Bad Request: blank name or key
async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryMutationResponse>)> {
    let category = NewCategory {
        name: validate::required_text("name", &request.name, validate::MAX_NAME_LEN)?,
        secret_key: validate::required_key("secret_key", &request.secret_key)?,
    };

    let inserted = state.repo().create_category(&category).await?;

    tracing::info!(
        category_id = %inserted.id,
        name = %category.name,
        "Category created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CategoryMutationResponse {
            id: inserted.id,
            rows_affected: inserted.rows_affected,
        }),
    ))
}

/// GET /categories/{id} - Fetch one category.
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> ApiResult<Json<Category>> {
    state
        .repo()
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("category {} not found", id)))
}

/// PUT /categories/{id} - Rename a category.
///
/// # Response
///
/// - 200 OK: `{ "id": 4, "rows_affected": 1 }`
/// - 400 Bad Request: invalid name or blank confirm key
/// - 403 Forbidden: no such category or key mismatch
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryMutationResponse>> {
    let change = CategoryChange {
        id,
        name: validate::required_text("name", &request.name, validate::MAX_NAME_LEN)?,
        confirm_key: validate::required_key("confirm_key", &request.confirm_key)?,
        replacement_key: validate::replacement_key("new_secret_key", request.new_secret_key)?,
    };

    let rows_affected = state.repo().update_category(&change).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found_or_key_mismatch());
    }

    tracing::info!(category_id = %id, "Category updated");

    Ok(Json(CategoryMutationResponse { id, rows_affected }))
}

/// DELETE /categories/{id} - Delete a category.
///
/// # Response
///
/// - 200 OK: `{ "id": 4, "rows_affected": 1 }`
/// - 403 Forbidden: no such category or key mismatch
/// - 409 Conflict: items are still filed under the category
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(request): Json<ConfirmKeyRequest>,
) -> ApiResult<Json<CategoryMutationResponse>> {
    let confirm_key = validate::required_key("confirm_key", &request.confirm_key)?;

    let rows_affected = state.repo().delete_category(id, &confirm_key).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found_or_key_mismatch());
    }

    tracing::info!(category_id = %id, "Category deleted");

    Ok(Json(CategoryMutationResponse { id, rows_affected }))
}

/// GET /categories/{id}/items - Items filed under a category.
///
/// An unknown category yields an empty list.
async fn category_items(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> ApiResult<Json<CategoryItemsResponse>> {
    let items = state.repo().items_in_category(id).await?;
    Ok(Json(CategoryItemsResponse {
        category_id: id,
        items,
    }))
}

/// Build category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/items", get(category_items))
}

// ============================================================================
// Tests
// ============================================================================
