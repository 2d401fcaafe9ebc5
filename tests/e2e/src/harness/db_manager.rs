//! Test Database Manager
//!
//! Provides isolated database instances for testing:
//! - Temporary databases that are automatically cleaned up
//! - Pre-seeded databases with state, events and goals
//! - Reopening the same file to check persistence

use std::path::PathBuf;

use tempfile::TempDir;
use tether_core::{Goal, GoalProgress, Storage, StorageStats};

/// Manager for test databases
///
/// Creates isolated database instances for each test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
/// db.storage.set_state("mood", "curious")?;
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// The storage instance
    pub storage: Storage,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_tether.db");

        let storage = Storage::new(Some(db_path.clone())).expect("Failed to create test storage");

        Self {
            storage,
            _temp_dir: Some(temp_dir),
            db_path,
        }
    }

    /// Create a test database at a specific path
    ///
    /// The database is NOT automatically deleted.
    pub fn new_at_path(path: PathBuf) -> Self {
        let storage = Storage::new(Some(path.clone())).expect("Failed to create test storage");

        Self {
            storage,
            _temp_dir: None,
            db_path: path,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Row counts for every collection
    pub fn stats(&self) -> StorageStats {
        self.storage.stats().expect("Failed to read stats")
    }

    /// Check if every collection is empty
    pub fn is_empty(&self) -> bool {
        self.stats() == StorageStats::default()
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Seed `count` state entries named `key-0..`
    pub fn seed_state(&self, count: usize) {
        for i in 0..count {
            self.storage
                .set_state(&format!("key-{}", i), &format!("value-{}", i))
                .expect("Failed to seed state");
        }
    }

    /// Seed `count` events, tagged round-robin with `topic-0..topic-4`
    pub fn seed_events(&self, count: usize) -> Vec<i64> {
        (0..count)
            .map(|i| {
                self.storage
                    .add_memory(
                        &format!("Test event number {}", i),
                        &[format!("topic-{}", i % 5)],
                    )
                    .expect("Failed to seed event")
            })
            .collect()
    }

    /// Seed `count` goals, all with status "new"
    pub fn seed_goals(&self, count: usize) -> Vec<Goal> {
        (0..count)
            .map(|i| {
                self.storage
                    .add_goal(&format!("Test goal {}", i))
                    .expect("Failed to seed goal")
            })
            .collect()
    }

    /// Seed one goal per status, each with a note naming it
    pub fn seed_goal_lifecycle(&self) -> Vec<Goal> {
        let statuses = ["new", "in_progress", "blocked", "done"];
        let mut goals = Vec::with_capacity(statuses.len());

        for status in statuses {
            let goal = self
                .storage
                .add_goal(&format!("Goal that is {}", status))
                .expect("Failed to seed goal");
            self.storage
                .update_goal_progress(
                    goal.id,
                    &GoalProgress::status(status).with_note(format!("moved to {}", status)),
                )
                .expect("Failed to update goal");
            goals.push(
                self.storage
                    .get_goal(goal.id)
                    .expect("Failed to read goal")
                    .expect("Seeded goal missing"),
            );
        }

        goals
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Close and reopen the same database file
    pub fn reopen(&mut self) {
        self.storage = Storage::new(Some(self.db_path.clone()))
            .expect("Failed to reopen storage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_database_creation() {
        let db = TestDatabaseManager::new_temp();
        assert!(db.is_empty());
        assert!(db.path().exists());
    }

    #[test]
    fn test_seed_counts() {
        let db = TestDatabaseManager::new_temp();
        db.seed_state(3);
        let ids = db.seed_events(10);
        db.seed_goals(4);

        assert_eq!(ids.len(), 10);
        let stats = db.stats();
        assert_eq!(stats.state_entries, 3);
        assert_eq!(stats.memory_events, 10);
        assert_eq!(stats.goals, 4);
    }

    #[test]
    fn test_seed_goal_lifecycle() {
        let db = TestDatabaseManager::new_temp();
        let goals = db.seed_goal_lifecycle();

        let statuses: Vec<&str> = goals.iter().map(|g| g.status.as_str()).collect();
        assert_eq!(statuses, vec!["new", "in_progress", "blocked", "done"]);
        assert_eq!(db.stats().goal_notes, 4);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let mut db = TestDatabaseManager::new_temp();
        db.seed_events(5);
        db.reopen();
        assert_eq!(db.stats().memory_events, 5);
    }
}
