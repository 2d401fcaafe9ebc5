//! Context Export
//!
//! Renders state, goals, and recent events into one plain-text block for an
//! external language model. The size bound is a hard character cap applied
//! after rendering, so the cut may land mid-line.

use crate::model::{Goal, MemoryEvent, StateEntry};
use crate::profile::ExportLimits;
use crate::storage::{Result, Storage};

pub const STATE_HEADER: &str = "# State:";
pub const GOALS_HEADER: &str = "# Goals:";
pub const MEMORY_HEADER: &str = "# Recent Memory:";

/// Render the three sections and cut the result to `max_chars` characters.
///
/// Headers are always emitted, even for empty sections.
pub fn render_context(
    state: &[StateEntry],
    goals: &[Goal],
    memories: &[MemoryEvent],
    max_chars: usize,
) -> String {
    let mut lines: Vec<String> =
        Vec::with_capacity(state.len() + goals.len() + memories.len() + 5);

    lines.push(STATE_HEADER.to_string());
    lines.extend(state.iter().map(|s| format!("- {}: {}", s.key, s.value)));

    lines.push(String::new());
    lines.push(GOALS_HEADER.to_string());
    lines.extend(
        goals
            .iter()
            .map(|g| format!("- [{}] ({}) {}", g.status, g.id, g.goal)),
    );

    lines.push(String::new());
    lines.push(MEMORY_HEADER.to_string());
    lines.extend(memories.iter().map(|m| format!("- {} ({})", m.event, m.tags)));

    let mut text = lines.join("\n");
    truncate_chars(&mut text, max_chars);
    text
}

/// Cut `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
}

impl Storage {
    /// Build the context block from the current contents of the store
    pub fn export_context(&self, limits: &ExportLimits) -> Result<String> {
        let (state, goals, memories) =
            self.export_snapshot(limits.max_goals, limits.max_memories)?;

        tracing::debug!(
            state = state.len(),
            goals = goals.len(),
            memories = memories.len(),
            "Rendering context export"
        );

        Ok(render_context(&state, &goals, &memories, limits.max_chars))
    }
}
