//! CLI argument definitions for the EcoBot shell.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use ecobot_core::config::EcobotConfig;

/// Value of `--db` that selects a throwaway in-memory database.
pub const MEMORY_DB: &str = ":memory:";

/// EcoBot - environmental data chatbot for the terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "ecobot", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// SQLite database file, or ":memory:".
    #[arg(long = "db")]
    pub db: Option<PathBuf>,

    /// JSON file of environmental records to load at startup.
    #[arg(long = "seed")]
    pub seed: Option<PathBuf>,

    /// Delay before each bot reply, in milliseconds.
    #[arg(long = "typing-delay-ms")]
    pub typing_delay_ms: Option<u64>,
}

/// Where the record store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ECOBOT_CONFIG env var > ~/.ecobot/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ECOBOT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config: &EcobotConfig) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config.general.log_level.clone())
    }

    /// Resolve the database location.
    ///
    /// Priority: --db flag > `storage.db_path` > `<data_dir>/ecobot.db`.
    pub fn resolve_db_target(&self, config: &EcobotConfig) -> DbTarget {
        let raw = match (&self.db, &config.storage.db_path) {
            (Some(p), _) => p.to_string_lossy().to_string(),
            (None, Some(p)) => p.clone(),
            (None, None) => {
                return DbTarget::File(expand_home(&config.general.data_dir).join("ecobot.db"))
            }
        };
        if raw == MEMORY_DB {
            DbTarget::Memory
        } else {
            DbTarget::File(expand_home(&raw))
        }
    }

    /// Resolve the seed file, if any.
    ///
    /// Priority: --seed flag > `storage.seed_file`.
    pub fn resolve_seed_file(&self, config: &EcobotConfig) -> Option<PathBuf> {
        self.seed
            .clone()
            .or_else(|| config.storage.seed_file.as_deref().map(expand_home))
    }

    /// Resolve the typing delay in milliseconds.
    ///
    /// Priority: --typing-delay-ms flag > ECOBOT_TYPING_DELAY_MS env var >
    /// config file value.
    pub fn resolve_typing_delay_ms(&self, config: &EcobotConfig) -> u64 {
        if let Some(ms) = self.typing_delay_ms {
            return ms;
        }
        if let Ok(val) = std::env::var("ECOBOT_TYPING_DELAY_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                return ms;
            }
        }
        config.chat.typing_delay_ms
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok().map(PathBuf::from)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".ecobot").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
