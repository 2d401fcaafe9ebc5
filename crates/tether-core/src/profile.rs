//! Service profiles
//!
//! The two deployed variants of the service differ only in how search limits
//! are treated and how many rows the context export pulls in.

use serde::{Deserialize, Serialize};

/// Hard cap on the rendered context, in characters
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 20_000;

/// Search limit when the caller does not give one
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Inclusive bounds applied to search limits under [`Profile::Full`]
pub const SEARCH_LIMIT_MIN: i64 = 1;
pub const SEARCH_LIMIT_MAX: i64 = 200;

/// Row caps and output cap for a context export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLimits {
    pub max_goals: usize,
    pub max_memories: usize,
    pub max_chars: usize,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Profile::default().export_limits()
    }
}

/// Service variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Clamped search limits, 50 goals and 100 events per export
    #[default]
    Full,
    /// Unclamped search limits, 20 goals and 50 events per export
    Compact,
}

impl Profile {
    pub fn export_limits(self) -> ExportLimits {
        match self {
            Profile::Full => ExportLimits {
                max_goals: 50,
                max_memories: 100,
                max_chars: DEFAULT_MAX_CONTEXT_CHARS,
            },
            Profile::Compact => ExportLimits {
                max_goals: 20,
                max_memories: 50,
                max_chars: DEFAULT_MAX_CONTEXT_CHARS,
            },
        }
    }

    /// Apply this profile's policy to a caller-supplied search limit.
    ///
    /// `Compact` passes the value through untouched, so a negative limit
    /// reaches SQLite as "no limit".
    pub fn search_limit(self, requested: i64) -> i64 {
        match self {
            Profile::Full => requested.clamp(SEARCH_LIMIT_MIN, SEARCH_LIMIT_MAX),
            Profile::Compact => requested,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Full => write!(f, "full"),
            Profile::Compact => write!(f, "compact"),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Profile::Full),
            "compact" => Ok(Profile::Compact),
            _ => Err(format!("Unknown profile: {}", s)),
        }
    }
}
