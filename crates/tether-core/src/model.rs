//! Record types
//!
//! One struct per query projection. Timestamps are unix seconds, matching the
//! INTEGER columns the schema stores them in.

use serde::{Deserialize, Serialize};

/// Status every goal starts with
pub const INITIAL_GOAL_STATUS: &str = "new";

/// Delimiter used to flatten a tag list into the `tags` column
pub const TAG_DELIMITER: &str = ",";

/// A key/value state entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}

/// A full memory event row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub id: i64,
    pub event: String,
    pub tags: String,
    pub created_at: i64,
}

impl MemoryEvent {
    /// Split the stored tag string back into tokens.
    ///
    /// Lossy when a tag itself contained the delimiter.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

/// Projection returned by full-text search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHit {
    pub id: i64,
    pub event: String,
    pub tags: String,
}

/// A tracked goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub goal: String,
    pub status: String,
    pub created_at: i64,
}

/// A progress note attached to a goal id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalNote {
    pub id: i64,
    pub goal_id: i64,
    pub note: String,
    pub created_at: i64,
}

/// Progress update for a goal. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub status: Option<String>,
    pub note: Option<String>,
}

impl GoalProgress {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            note: None,
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            status: None,
            note: Some(note.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub(crate) fn effective_status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn effective_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// Row counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub state_entries: i64,
    pub memory_events: i64,
    pub goals: i64,
    pub goal_notes: i64,
}

/// Flatten tags into the stored column value. No escaping is applied.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(TAG_DELIMITER)
}

/// Inverse of [`join_tags`]; an empty column yields no tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }
    tags.split(TAG_DELIMITER).map(str::to_string).collect()
}
