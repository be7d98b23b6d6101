use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the per-directory state folder holding config, history, lock and
/// logs.
pub const STATE_DIR_NAME: &str = ".renamebatch";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default preview format: "table", "summary" or "none"
    #[serde(default = "default_preview")]
    pub preview_format: String,

    /// Combine filter rules with OR instead of AND by default
    #[serde(default)]
    pub match_any: bool,

    /// Case-sensitive filter matching by default
    #[serde(default)]
    pub case_sensitive: bool,

    /// Write a CSV audit log on apply by default
    #[serde(default = "default_true")]
    pub audit_log: bool,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preview_format: default_preview(),
            match_any: false,
            case_sensitive: false,
            audit_log: true,
            use_color: None,
        }
    }
}

fn default_preview() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from `.renamebatch/config.toml` in the current directory
    /// if it exists; otherwise the defaults.
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(STATE_DIR_NAME).join("config.toml");
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_safe() {
        let config = Config::default();
        assert_eq!(config.defaults.preview_format, "table");
        assert!(!config.defaults.match_any);
        assert!(!config.defaults.case_sensitive);
        assert!(config.defaults.audit_log);
        assert_eq!(config.defaults.use_color, None);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\nmatch_any = true\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(config.defaults.match_any);
        assert_eq!(config.defaults.preview_format, "table");
        assert!(config.defaults.audit_log);
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("config.toml");
        let mut config = Config::default();
        config.defaults.case_sensitive = true;
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert!(reloaded.defaults.case_sensitive);
    }
}
