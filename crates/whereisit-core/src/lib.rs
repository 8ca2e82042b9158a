//! whereisit-core: domain types for the WhereIsIt lost-and-found board
//!
//! This crate provides:
//! - Identifier, status and contact types for categories and items
//! - Read and write shapes shared by the store and the HTTP server
//! - The secret-key policy that authorizes mutations

pub mod policy;
pub mod types;

pub use policy::{AdminKey, Authorization, KeyUpdate, SecretKeyPolicy, UpdateDecision};
pub use types::*;
