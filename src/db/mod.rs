//! Database module: catalog rows, schema and storage operations.
//!
//! Layout:
//! - `models.rs`: entity kinds, storage traits, links and join rows
//! - `entities.rs`: catalog row structs with their create/patch payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: `CatalogStorage` and generic CRUD
//! - `compat.rs`, `links.rs`: relation and link operations on the storage

pub mod compat;
pub mod entities;
pub mod links;
pub mod models;
pub mod schema;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod test_utils;

pub use compat::{CompatRelation, NewCompat};
pub use models::{CatalogEntity, EntityKind, Link, SearchHit};
pub use schema::SQLITE_INIT;
pub use sqlite::{CatalogStorage, ListFilter, SqlitePool};
