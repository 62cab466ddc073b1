use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EcobotError, Result};

/// Top-level configuration for EcoBot.
///
/// Loaded from `~/.ecobot/config.toml` by default. Every section falls back
/// to its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcobotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl EcobotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EcobotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| EcobotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Data directory for the records database.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: "~/.ecobot/data".to_string(),
        }
    }
}

/// Chatbot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the chatbot accepts messages at all.
    pub enabled: bool,
    /// Cosmetic "typing" delay before the bot reply is produced.
    pub typing_delay_ms: u64,
    /// Maximum accepted message length, in characters.
    pub max_message_chars: usize,
    /// Quote the user's text in the fallback reply instead of the fixed menu
    /// reminder.
    pub echo_unmatched: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            typing_delay_ms: 1000,
            max_message_chars: 2000,
            echo_unmatched: false,
        }
    }
}

/// Record store and forum settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file, or `:memory:`. `None` means
    /// `<general.data_dir>/ecobot.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    /// JSON file of records loaded into the store at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<String>,
    /// Add the starter discussions when the forum is empty.
    pub sample_forum: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            seed_file: None,
            sample_forum: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = EcobotConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.data_dir, "~/.ecobot/data");
        assert!(config.chat.enabled);
        assert_eq!(config.chat.typing_delay_ms, 1000);
        assert_eq!(config.chat.max_message_chars, 2000);
        assert!(!config.chat.echo_unmatched);
        assert!(config.storage.db_path.is_none());
        assert!(config.storage.seed_file.is_none());
        assert!(config.storage.sample_forum);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
data_dir = "/srv/ecobot"

[chat]
enabled = true
typing_delay_ms = 250
max_message_chars = 500
echo_unmatched = true

[storage]
db_path = "/srv/ecobot/records.db"
seed_file = "/srv/ecobot/seed.json"
sample_forum = false
"#;
        let file = create_temp_config(content);
        let config = EcobotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.data_dir, "/srv/ecobot");
        assert_eq!(config.chat.typing_delay_ms, 250);
        assert_eq!(config.chat.max_message_chars, 500);
        assert!(config.chat.echo_unmatched);
        assert_eq!(
            config.storage.db_path.as_deref(),
            Some("/srv/ecobot/records.db")
        );
        assert_eq!(
            config.storage.seed_file.as_deref(),
            Some("/srv/ecobot/seed.json")
        );
        assert!(!config.storage.sample_forum);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[chat]
typing_delay_ms = 0
"#;
        let file = create_temp_config(content);
        let config = EcobotConfig::load(file.path()).unwrap();
        assert_eq!(config.chat.typing_delay_ms, 0);
        assert!(config.chat.enabled);
        assert_eq!(config.chat.max_message_chars, 2000);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = EcobotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.typing_delay_ms, 1000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = EcobotConfig::load(file.path());
        assert!(matches!(result, Err(EcobotError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = EcobotConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.chat.typing_delay_ms, 1000);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = EcobotConfig::default();
        config.chat.echo_unmatched = true;
        config.storage.db_path = Some("records.db".to_string());
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = EcobotConfig::load(&path).unwrap();
        assert!(reloaded.chat.echo_unmatched);
        assert_eq!(reloaded.storage.db_path.as_deref(), Some("records.db"));
    }
}
