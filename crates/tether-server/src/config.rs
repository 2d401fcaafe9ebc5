//! Server configuration
//!
//! Read once at startup from flags or the matching environment variables,
//! then shared read-only through [`crate::state::AppState`].

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tether_core::Profile;

/// Secret used when neither `--api-key` nor `API_KEY` is set
pub const DEFAULT_API_KEY: &str = "change-me";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Tether - persistent memory and state for agents
#[derive(Debug, Clone, Parser)]
#[command(name = "tether")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bearer-authenticated memory, state and goal service for agents")]
pub struct Config {
    /// Shared bearer secret
    #[arg(long, env = "API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, env = "DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Comma-separated CORS origins, `*` for any
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    /// Address to bind
    #[arg(long, env = "TETHER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "TETHER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Service profile: `full` or `compact`
    #[arg(long, env = "TETHER_PROFILE", default_value_t = Profile::Full)]
    pub profile: Profile,

    /// Directory holding the optional web UI (`index.html` and assets)
    #[arg(long, env = "TETHER_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Log output format
    #[arg(long, env = "TETHER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            db_path: None,
            allowed_origins: "*".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            profile: Profile::Full,
            static_dir: PathBuf::from("static"),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Parsed origin list; `None` means any origin
    pub fn origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Whether the built-in secret is still in use
    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}
