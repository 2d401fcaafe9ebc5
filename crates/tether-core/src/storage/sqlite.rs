//! SQLite Storage Implementation
//!
//! State, event log, and goal tracking over a single database file.

use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::model::{
    join_tags, Goal, GoalNote, GoalProgress, MemoryEvent, MemoryHit, StateEntry, StorageStats,
    INITIAL_GOAL_STATUS,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Full-text query the FTS5 parser rejected
    #[error("Malformed search query: {0}")]
    QuerySyntax(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// A connection mutex was poisoned by a panicking holder
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Classify an error raised while running a MATCH query.
///
/// FTS5 reports every parse failure as plain SQLITE_ERROR with a free-form
/// message, so any SQLITE_ERROR raised by the MATCH step is treated as a bad
/// query. Busy, corrupt and I/O failures carry their own codes and stay
/// database errors.
fn classify_match_error(err: rusqlite::Error) -> StorageError {
    if let rusqlite::Error::SqliteFailure(failure, msg) = &err {
        let msg = msg.as_deref().unwrap_or_default();
        if failure.code == ErrorCode::Unknown || is_fts5_syntax_message(msg) {
            return StorageError::QuerySyntax(msg.to_string());
        }
    }
    StorageError::Database(err)
}

fn is_fts5_syntax_message(msg: &str) -> bool {
    msg.starts_with("fts5:")
        || msg.contains("unterminated string")
        || msg.starts_with("no such column")
        || msg.starts_with("unknown special query")
        || msg.starts_with("expected integer")
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage handle
///
/// Holds one writer and one reader connection, each behind a mutex that is
/// taken for the duration of a single operation. All methods take `&self`,
/// so the HTTP layer shares an `Arc<Storage>`.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl Storage {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("TETHER_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Platform data location used when no path is configured
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "tether", "tether").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("tether.db"))
    }

    /// Open (or create) the store and make sure the schema exists.
    ///
    /// Safe to call on every start, including against a populated database.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer_conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;
        super::schema::apply_schema(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::info!(path = %path.display(), "Storage opened");

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Lock("Writer lock poisoned".into()))
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Lock("Reader lock poisoned".into()))
    }

    // ========================================================================
    // STATE
    // ========================================================================

    /// Insert or overwrite a state value
    pub fn set_state(&self, key: &str, value: &str) -> Result<()> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO state(k, v, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(k) DO UPDATE SET v = excluded.v, updated_at = excluded.updated_at",
            params![key, value, now_secs()],
        )?;
        Ok(())
    }

    /// Look up a state value; `None` when the key was never set
    pub fn get_state(&self, key: &str) -> Result<Option<String>> {
        let reader = self.reader()?;
        reader
            .query_row("SELECT v FROM state WHERE k = ?1", params![key], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()
            .map(Option::flatten)
            .map_err(StorageError::from)
    }

    /// All state entries, most recently updated first
    pub fn all_state(&self) -> Result<Vec<StateEntry>> {
        let reader = self.reader()?;
        Self::query_all_state(&reader)
    }

    fn query_all_state(conn: &Connection) -> Result<Vec<StateEntry>> {
        let mut stmt = conn.prepare(
            "SELECT k, COALESCE(v, ''), COALESCE(updated_at, 0) FROM state
             ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StateEntry {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // ========================================================================
    // MEMORY EVENTS
    // ========================================================================

    /// Append an event to the log and return its id.
    ///
    /// Tags are comma-joined without escaping.
    pub fn add_memory<S: AsRef<str>>(&self, event: &str, tags: &[S]) -> Result<i64> {
        let tags = join_tags(tags);
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO memory(event, tags, created_at) VALUES (?1, ?2, ?3)",
            params![event, tags, now_secs()],
        )?;
        Ok(writer.last_insert_rowid())
    }

    /// Full-text search over event text and tags.
    ///
    /// Rows come back in FTS5's own match order. `limit` is passed to SQLite
    /// as given; apply a [`crate::Profile`] policy before calling.
    pub fn search_memory(&self, query: &str, limit: i64) -> Result<Vec<MemoryHit>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT rowid, event, tags FROM memory
             WHERE memory MATCH ?1
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![query, limit], |row| {
                Ok(MemoryHit {
                    id: row.get(0)?,
                    event: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    tags: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })
            .map_err(classify_match_error)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(classify_match_error)?);
        }
        Ok(result)
    }

    /// Most recent events, newest first
    pub fn recent_memories(&self, limit: usize) -> Result<Vec<MemoryEvent>> {
        let reader = self.reader()?;
        Self::query_recent_memories(&reader, limit)
    }

    fn query_recent_memories(conn: &Connection, limit: usize) -> Result<Vec<MemoryEvent>> {
        let mut stmt = conn.prepare(
            "SELECT rowid, event, tags, created_at FROM memory
             ORDER BY rowid DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(MemoryEvent {
                id: row.get(0)?,
                event: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                tags: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                created_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // ========================================================================
    // GOALS
    // ========================================================================

    /// Create a goal with status "new"
    pub fn add_goal(&self, goal: &str) -> Result<Goal> {
        let created_at = now_secs();
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO goals(goal, status, created_at) VALUES (?1, ?2, ?3)",
            params![goal, INITIAL_GOAL_STATUS, created_at],
        )?;

        Ok(Goal {
            id: writer.last_insert_rowid(),
            goal: goal.to_string(),
            status: INITIAL_GOAL_STATUS.to_string(),
            created_at,
        })
    }

    /// Apply a progress update.
    ///
    /// Neither part checks that the goal exists: a status update on an
    /// unknown id touches zero rows, and a note is stored regardless. Both
    /// parts run in one transaction.
    pub fn update_goal_progress(&self, goal_id: i64, progress: &GoalProgress) -> Result<()> {
        let status = progress.effective_status();
        let note = progress.effective_note();
        if status.is_none() && note.is_none() {
            return Ok(());
        }

        let mut writer = self.writer()?;
        let tx = writer.transaction()?;
        if let Some(status) = status {
            let rows = tx.execute(
                "UPDATE goals SET status = ?1 WHERE id = ?2",
                params![status, goal_id],
            )?;
            if rows == 0 {
                tracing::debug!(goal_id, "Status update matched no goal");
            }
        }
        if let Some(note) = note {
            tx.execute(
                "INSERT INTO goal_notes(goal_id, note, created_at) VALUES (?1, ?2, ?3)",
                params![goal_id, note, now_secs()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Get a goal by id
    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let reader = self.reader()?;
        reader
            .query_row(
                "SELECT id, goal, status, created_at FROM goals WHERE id = ?1",
                params![id],
                Self::row_to_goal,
            )
            .optional()
            .map_err(StorageError::from)
    }

    /// Most recently created goals, newest first
    pub fn recent_goals(&self, limit: usize) -> Result<Vec<Goal>> {
        let reader = self.reader()?;
        Self::query_recent_goals(&reader, limit)
    }

    fn query_recent_goals(conn: &Connection, limit: usize) -> Result<Vec<Goal>> {
        let mut stmt = conn.prepare(
            "SELECT id, goal, status, created_at FROM goals
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::row_to_goal)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Notes recorded against a goal id, oldest first
    pub fn goal_notes(&self, goal_id: i64) -> Result<Vec<GoalNote>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT id, goal_id, note, created_at FROM goal_notes
             WHERE goal_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![goal_id], |row| {
            Ok(GoalNote {
                id: row.get(0)?,
                goal_id: row.get(1)?,
                note: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                created_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        Ok(Goal {
            id: row.get(0)?,
            goal: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            status: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            created_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
        })
    }

    // ========================================================================
    // AGGREGATES
    // ========================================================================

    /// Read the three export sections under one reader lock
    pub(crate) fn export_snapshot(
        &self,
        max_goals: usize,
        max_memories: usize,
    ) -> Result<(Vec<StateEntry>, Vec<Goal>, Vec<MemoryEvent>)> {
        let reader = self.reader()?;
        let state = Self::query_all_state(&reader)?;
        let goals = Self::query_recent_goals(&reader, max_goals)?;
        let memories = Self::query_recent_memories(&reader, max_memories)?;
        Ok((state, goals, memories))
    }

    /// Row counts for each collection
    pub fn stats(&self) -> Result<StorageStats> {
        let reader = self.reader()?;
        let count = |table: &str| -> Result<i64> {
            reader
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .map_err(StorageError::from)
        };

        Ok(StorageStats {
            state_entries: count("state")?,
            memory_events: count("memory")?,
            goals: count("goals")?,
            goal_notes: count("goal_notes")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
