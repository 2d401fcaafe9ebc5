//! Journey: an agent pulls its context block before a model call

use tether_core::{
    GoalProgress, Profile, DEFAULT_MAX_CONTEXT_CHARS, GOALS_HEADER, MEMORY_HEADER, STATE_HEADER,
};
use tether_e2e_tests::{TestDataFactory, TestDatabaseManager};

fn header_positions(text: &str) -> (usize, usize, usize) {
    (
        text.find(STATE_HEADER).expect("state header"),
        text.find(GOALS_HEADER).expect("goals header"),
        text.find(MEMORY_HEADER).expect("memory header"),
    )
}

#[test]
fn test_empty_store_exports_headers_only() {
    let db = TestDatabaseManager::new_temp();
    let text = db
        .storage
        .export_context(&Profile::Full.export_limits())
        .unwrap();

    assert_eq!(text, "# State:\n\n# Goals:\n\n# Recent Memory:");
}

#[test]
fn test_first_goal_scenario() {
    let db = TestDatabaseManager::new_temp();

    db.storage.set_state("mood", "curious").unwrap();
    assert_eq!(db.storage.get_state("mood").unwrap().as_deref(), Some("curious"));

    db.storage
        .add_memory("user asked about rust ownership", &["rust", "qna"])
        .unwrap();
    let hits = db.storage.search_memory("ownership", 20).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].tags, "rust,qna");

    let goal = db.storage.add_goal("ship v1").unwrap();
    assert_eq!(goal.id, 1);
    assert_eq!(goal.goal, "ship v1");
    assert_eq!(goal.status, "new");

    db.storage
        .update_goal_progress(
            1,
            &GoalProgress::status("in_progress").with_note("drafted spec"),
        )
        .unwrap();

    let text = db
        .storage
        .export_context(&Profile::Full.export_limits())
        .unwrap();
    let (state, goals, memory) = header_positions(&text);
    assert!(state < goals && goals < memory);

    let goal_line = text.find("- [in_progress] (1) ship v1").expect("goal line");
    assert!(goal_line > goals && goal_line < memory);
    assert!(text.contains("- mood: curious"));
    assert!(text.ends_with("- user asked about rust ownership (rust,qna)"));
}

#[test]
fn test_export_reflects_full_session() {
    let db = TestDatabaseManager::new_temp();
    TestDataFactory::coding_session(&db.storage);

    let text = db
        .storage
        .export_context(&Profile::Full.export_limits())
        .unwrap();

    assert!(text.contains("- user.name: Ada"));
    assert!(text.contains("- [new] (2) write docs"));
    assert!(text.contains("- deployment postponed to friday ()"));
    // Newest event first
    let newest = text.find("deployment postponed").unwrap();
    let oldest = text.find("rust ownership").unwrap();
    assert!(newest < oldest);
}

#[test]
fn test_compact_profile_caps_sections() {
    let db = TestDatabaseManager::new_temp();
    db.seed_goals(30);
    db.seed_events(80);

    let limits = Profile::Compact.export_limits();
    let text = db.storage.export_context(&limits).unwrap();

    let goal_lines = text.lines().filter(|l| l.starts_with("- [")).count();
    let event_lines = text
        .lines()
        .filter(|l| l.starts_with("- Test event number"))
        .count();
    assert_eq!(goal_lines, limits.max_goals);
    assert_eq!(event_lines, limits.max_memories);
}

#[test]
fn test_large_store_respects_character_cap() {
    let db = TestDatabaseManager::new_temp();
    let filler = "x".repeat(500);
    for i in 0..100 {
        db.storage
            .set_state(&format!("blob-{}", i), &filler)
            .unwrap();
    }

    let text = db
        .storage
        .export_context(&Profile::Full.export_limits())
        .unwrap();

    assert_eq!(text.chars().count(), DEFAULT_MAX_CONTEXT_CHARS);
    assert!(text.starts_with(STATE_HEADER));
}

#[test]
fn test_lifecycle_statuses_render() {
    let db = TestDatabaseManager::new_temp();
    let goals = db.seed_goal_lifecycle();

    let text = db
        .storage
        .export_context(&Profile::Full.export_limits())
        .unwrap();

    for goal in &goals {
        let line = format!("- [{}] ({}) {}", goal.status, goal.id, goal.goal);
        assert!(text.contains(&line), "missing {line}");
    }
}
