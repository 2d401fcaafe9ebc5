//! Database Schema
//!
//! Every statement is `IF NOT EXISTS`, so applying the schema to an existing
//! database is a no-op and never touches stored rows.

/// A schema object the storage layer relies on
#[derive(Debug, Clone)]
pub struct SchemaObject {
    /// Table name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// SQL to create it
    pub create: &'static str,
}

/// Schema objects, in creation order
pub const SCHEMA: &[SchemaObject] = &[
    SchemaObject {
        name: "state",
        description: "Key/value state, one row per key",
        create: STATE_TABLE,
    },
    SchemaObject {
        name: "memory",
        description: "Append-only event log with porter-stemmed FTS5 index",
        create: MEMORY_TABLE,
    },
    SchemaObject {
        name: "goals",
        description: "Goals with free-text status",
        create: GOALS_TABLE,
    },
    SchemaObject {
        name: "goal_notes",
        description: "Progress notes, goal_id is not a foreign key",
        create: GOAL_NOTES_TABLE,
    },
];

const STATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS state(
    k TEXT PRIMARY KEY,
    v TEXT,
    updated_at INTEGER
);
"#;

// created_at is stored alongside the indexed columns but never tokenized
const MEMORY_TABLE: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS memory USING fts5(
    event,
    tags,
    created_at UNINDEXED,
    tokenize = 'porter'
);
"#;

const GOALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS goals(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    goal TEXT,
    status TEXT,
    created_at INTEGER
);
"#;

const GOAL_NOTES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS goal_notes(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    goal_id INTEGER,
    note TEXT,
    created_at INTEGER
);
"#;

/// Create any missing schema objects
pub fn apply_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    for object in SCHEMA {
        tracing::debug!(table = object.name, "Ensuring table: {}", object.description);
        conn.execute_batch(object.create)?;
    }
    Ok(())
}
