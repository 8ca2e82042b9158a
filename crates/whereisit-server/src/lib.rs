//! whereisit-server: HTTP API server for the WhereIsIt lost-and-found board
//!
//! This crate provides:
//! - JSON endpoints for browsing, posting, editing and deleting categories
//!   and items
//! - Request validation in front of the store
//! - Mapping of store outcomes to HTTP statuses (a zero row count becomes
//!   403, a category that still has items becomes 409)
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use whereisit_server::{AppState, ServerConfig, routes};
//! use whereisit_store::{Repository, Store, StoreConfig};
//!
//! let store = Store::connect(StoreConfig::from_env()?).await?;
//! let state = AppState::new(Repository::new(store), ServerConfig::from_env()?);
//! let app = routes::build_router(state);
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validate;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

// Re-export dependent crates
pub use whereisit_core;
pub use whereisit_store;
