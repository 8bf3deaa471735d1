use crate::core::weekly::DEFAULT_WEEKLY_TARGET;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Every key a complete configuration file carries.
pub const KNOWN_KEYS: [&str; 4] = [
    "database",
    "technicians",
    "weekly_target",
    "verify_completions",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Roster in assignment order.
    #[serde(default)]
    pub technicians: Vec<String>,
    #[serde(default = "default_weekly_target")]
    pub weekly_target: usize,
    /// Re-read every completion after commit.
    #[serde(default = "default_verify")]
    pub verify_completions: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_weekly_target() -> usize {
    DEFAULT_WEEKLY_TARGET
}
fn default_verify() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            technicians: Vec::new(),
            weekly_target: default_weekly_target(),
            verify_completions: default_verify(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.pmplanner`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pmplanner")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pmplanner.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pmplanner.sqlite")
    }

    /// `~/x` expands to the home directory; other relative names live in the
    /// config directory.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        if let Some(rest) = name.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        let p = PathBuf::from(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(content)?;
        if cfg.weekly_target == 0 {
            return Err(AppError::Config("weekly_target must be at least 1".into()));
        }
        Ok(cfg)
    }

    /// Keys of [`KNOWN_KEYS`] that the YAML text does not set.
    pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
        let yaml: Value = serde_yaml::from_str(content)?;
        let map = yaml.as_mapping();
        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.is_some_and(|m| m.contains_key(*k)))
            .collect())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was set up.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}
