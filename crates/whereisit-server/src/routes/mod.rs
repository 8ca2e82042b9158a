//! Route definitions for the HTTP API.

pub mod categories;
pub mod health;
pub mod items;

use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

/// Request body for DELETE on categories and items.
#[derive(Debug, Deserialize)]
pub struct ConfirmKeyRequest {
    /// The record's secret key, or the administrator key.
    pub confirm_key: String,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(categories::routes())
        .merge(items::routes())
        .with_state(state)
}
