use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Clocking out of a session older than this asks for confirmation.
    #[serde(default = "default_long_session_hours")]
    pub long_session_hours: i64,
    /// How far in the past `clok in --first` puts the clock-in.
    #[serde(default = "default_first_offset")]
    pub first_clock_in_offset_minutes: i64,
}

pub const DEFAULT_LONG_SESSION_HOURS: i64 = 12;
pub const DEFAULT_FIRST_OFFSET_MINUTES: i64 = 5;

fn default_long_session_hours() -> i64 {
    DEFAULT_LONG_SESSION_HOURS
}
fn default_first_offset() -> i64 {
    DEFAULT_FIRST_OFFSET_MINUTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            long_session_hours: default_long_session_hours(),
            first_clock_in_offset_minutes: default_first_offset(),
        }
    }
}

impl Config {
    /// `~/.clok`, or `./.clok` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clok")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("clok.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("clok.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Unless `is_test`, create the config directory and write the config file.
    /// Returns the resulting configuration.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let mut config = if is_test {
            Config::default()
        } else {
            Self::load()?
        };

        if let Some(path) = custom_db {
            config.database = path.to_string();
        }

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}
