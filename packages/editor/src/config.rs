use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    /// Language given to newly added code blocks
    #[serde(default = "default_code_language")]
    pub default_code_language: String,

    #[serde(default)]
    pub autosave: AutosaveConfig,
}

fn default_code_language() -> String {
    folio_model::DEFAULT_CODE_LANGUAGE.to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults if the file is absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, crate::EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            default_code_language: default_code_language(),
            autosave: AutosaveConfig::default(),
        }
    }
}

/// Undo log sizing and edit coalescing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of retained entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Quiet period before a content edit is committed
    #[serde(default = "default_history_debounce")]
    pub debounce_ms: u64,
}

fn default_capacity() -> usize {
    50
}

fn default_history_debounce() -> u64 {
    500
}

impl HistoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Capacity below one would leave no current entry
    pub fn normalized(self) -> Self {
        Self {
            capacity: self.capacity.max(1),
            ..self
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            debounce_ms: default_history_debounce(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveConfig {
    #[serde(default = "default_autosave_debounce")]
    pub debounce_ms: u64,
}

fn default_autosave_debounce() -> u64 {
    1000
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_autosave_debounce(),
        }
    }
}
