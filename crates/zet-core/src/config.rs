//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/zet/config.toml)
//! 3. Environment variables (ZET_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::note::ROOT_ID;

/// Environment variable prefix
const ENV_PREFIX: &str = "ZET";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the note collection
    #[serde(default)]
    pub notes_dir: Option<PathBuf>,

    /// Id of the note that depth is measured from
    #[serde(default = "default_root_id")]
    pub root_id: String,

    /// Tags starting with this prefix are categories
    #[serde(default = "default_category_prefix")]
    pub category_prefix: String,

    /// File extension of note files (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory names skipped while scanning
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: None,
            root_id: default_root_id(),
            category_prefix: default_category_prefix(),
            extension: default_extension(),
            excluded_dirs: default_excluded_dirs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (ZET_NOTES_DIR, ZET_ROOT_ID, ZET_CATEGORY_PREFIX, ZET_LOG_FILE)
    /// 2. Config file (~/.config/zet/config.toml or ZET_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // ZET_NOTES_DIR
        if let Ok(val) = std::env::var(format!("{}_NOTES_DIR", ENV_PREFIX)) {
            self.notes_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // ZET_ROOT_ID
        if let Ok(val) = std::env::var(format!("{}_ROOT_ID", ENV_PREFIX)) {
            if !val.is_empty() {
                self.root_id = val;
            }
        }

        // ZET_CATEGORY_PREFIX
        if let Ok(val) = std::env::var(format!("{}_CATEGORY_PREFIX", ENV_PREFIX)) {
            if !val.is_empty() {
                self.category_prefix = val;
            }
        }

        // ZET_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with ZET_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zet")
            .join("config.toml")
    }

    /// The configured notes directory, or `fallback` when unset
    pub fn notes_dir_or(&self, fallback: &Path) -> PathBuf {
        self.notes_dir
            .clone()
            .unwrap_or_else(|| fallback.to_path_buf())
    }
}

fn default_root_id() -> String {
    ROOT_ID.to_string()
}

fn default_category_prefix() -> String {
    "c_".to_string()
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_excluded_dirs() -> Vec<String> {
    vec![".git".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "ZET_NOTES_DIR",
        "ZET_ROOT_ID",
        "ZET_CATEGORY_PREFIX",
        "ZET_LOG_FILE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.notes_dir.is_none());
        assert_eq!(config.root_id, "00000000000000");
        assert_eq!(config.category_prefix, "c_");
        assert_eq!(config.extension, "md");
        assert_eq!(config.excluded_dirs, vec![".git"]);
    }

    #[test]
    fn test_env_override_notes_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("ZET_NOTES_DIR", "/tmp/zet-notes");
        config.apply_env_overrides();
        assert_eq!(config.notes_dir, Some(PathBuf::from("/tmp/zet-notes")));

        // Empty string clears it
        env::set_var("ZET_NOTES_DIR", "");
        config.apply_env_overrides();
        assert!(config.notes_dir.is_none());
    }

    #[test]
    fn test_env_override_root_and_prefix() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("ZET_ROOT_ID", "20200101000000");
        env::set_var("ZET_CATEGORY_PREFIX", "cat/");
        config.apply_env_overrides();

        assert_eq!(config.root_id, "20200101000000");
        assert_eq!(config.category_prefix, "cat/");

        // Empty values keep the current setting
        env::set_var("ZET_ROOT_ID", "");
        config.apply_env_overrides();
        assert_eq!(config.root_id, "20200101000000");
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            notes_dir = "/custom/notes"
            category_prefix = "k_"
            excluded_dirs = [".git", "archive"]
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.notes_dir, Some(PathBuf::from("/custom/notes")));
        assert_eq!(config.category_prefix, "k_");
        assert_eq!(config.excluded_dirs, vec![".git", "archive"]);
        // Unset fields fall back to defaults
        assert_eq!(config.root_id, "00000000000000");
        assert_eq!(config.extension, "md");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.notes_dir.is_none());
        assert_eq!(config.root_id, "00000000000000");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            notes_dir: Some(PathBuf::from("/data/notes")),
            log_file: Some(PathBuf::from("/data/zet.log")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.notes_dir, config.notes_dir);
        assert_eq!(loaded.log_file, config.log_file);
        assert_eq!(loaded.excluded_dirs, config.excluded_dirs);
    }

    #[test]
    fn test_notes_dir_or() {
        let config = Config::default();
        assert_eq!(config.notes_dir_or(Path::new(".")), PathBuf::from("."));

        let config = Config {
            notes_dir: Some(PathBuf::from("/notes")),
            ..Config::default()
        };
        assert_eq!(config.notes_dir_or(Path::new(".")), PathBuf::from("/notes"));
    }
}
