//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Idempotent schema creation
//! - Upsert key/value state
//! - FTS5 event log with porter stemming
//! - Goal and goal-note tracking

mod schema;
mod sqlite;

pub use schema::{apply_schema, SchemaObject, SCHEMA};
pub use sqlite::{Result, Storage, StorageError};
