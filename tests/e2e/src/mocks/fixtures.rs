//! Test Data Factory
//!
//! Realistic agent-session data: what an assistant would write into its
//! memory service over a working session.

use tether_core::{Goal, GoalProgress, Storage};

/// Factory for creating test data
pub struct TestDataFactory;

/// What a simulated session wrote, for assertions
#[derive(Debug, Default)]
pub struct AgentSession {
    /// State keys set, in order
    pub state_keys: Vec<String>,
    /// Event ids appended, in order
    pub event_ids: Vec<i64>,
    /// Goals created, with their final status
    pub goals: Vec<Goal>,
}

impl TestDataFactory {
    /// Append an event with tags
    pub fn create_event(storage: &Storage, event: &str, tags: &[&str]) -> i64 {
        storage
            .add_memory(event, tags)
            .expect("Failed to add event")
    }

    /// Create a goal and move it to `status`
    pub fn create_goal_with_status(storage: &Storage, goal: &str, status: &str) -> Goal {
        let created = storage.add_goal(goal).expect("Failed to add goal");
        storage
            .update_goal_progress(created.id, &GoalProgress::status(status))
            .expect("Failed to update goal");
        Goal {
            status: status.to_string(),
            ..created
        }
    }

    /// A short coding-assistant session
    pub fn coding_session(storage: &Storage) -> AgentSession {
        let mut session = AgentSession::default();

        for (key, value) in [
            ("user.name", "Ada"),
            ("project", "tether"),
            ("mood", "curious"),
        ] {
            storage.set_state(key, value).expect("Failed to set state");
            session.state_keys.push(key.to_string());
        }

        for (event, tags) in [
            ("user asked about rust ownership", &["rust", "qna"][..]),
            ("explained borrowing and lifetimes", &["rust", "teaching"][..]),
            ("user is running the test suite", &["testing"][..]),
            ("deployment postponed to friday", &[][..]),
        ] {
            session
                .event_ids
                .push(Self::create_event(storage, event, tags));
        }

        session
            .goals
            .push(Self::create_goal_with_status(storage, "ship v1", "in_progress"));
        session
            .goals
            .push(Self::create_goal_with_status(storage, "write docs", "new"));

        session
    }
}
