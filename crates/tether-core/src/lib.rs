//! # Tether Core
//!
//! Persistent memory for an external agent, backed by one SQLite file:
//!
//! - **State**: key/value entries, last write wins
//! - **Memory**: append-only event log with a porter-stemmed FTS5 index
//! - **Goals**: goals with free-text status plus append-only progress notes
//! - **Context export**: a bounded plain-text summary of all three
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether_core::{GoalProgress, Profile, Storage};
//!
//! # fn main() -> tether_core::Result<()> {
//! let storage = Storage::new(Some("data/tether.db".into()))?;
//!
//! storage.set_state("mood", "curious")?;
//! storage.add_memory("user asked about rust ownership", &["rust", "qna"])?;
//!
//! let goal = storage.add_goal("ship v1")?;
//! storage.update_goal_progress(goal.id, &GoalProgress::status("in_progress"))?;
//!
//! let hits = storage.search_memory("ownership", Profile::Full.search_limit(20))?;
//! let context = storage.export_context(&Profile::Full.export_limits())?;
//! # let _ = (hits, context);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite from source
//! - `encryption`: SQLCipher build, keyed from `TETHER_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod export;
pub mod model;
pub mod profile;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use export::{render_context, GOALS_HEADER, MEMORY_HEADER, STATE_HEADER};

pub use model::{
    join_tags, split_tags, Goal, GoalNote, GoalProgress, MemoryEvent, MemoryHit, StateEntry,
    StorageStats, INITIAL_GOAL_STATUS, TAG_DELIMITER,
};

pub use profile::{
    ExportLimits, Profile, DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_SEARCH_LIMIT, SEARCH_LIMIT_MAX,
    SEARCH_LIMIT_MIN,
};

pub use storage::{Result, Storage, StorageError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
