//! # Scheduler Configuration
//!
//! Settings for the report dispatcher daemon.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            poll 30s, batch 20, retention 90 days          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  2. scheduler.toml      explicit path, else                            │
//! │                         <config dir>/backroom-pos/scheduler.toml       │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  3. Environment         BACKROOM_DB_PATH, BACKROOM_POLL_INTERVAL_SECS, │
//! │                         BACKROOM_BATCH_SIZE, BACKROOM_OUTPUT_DIR,      │
//! │                         BACKROOM_RETENTION_DAYS                        │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{SchedulerError, SchedulerResult};

/// Largest batch the dispatcher will pull per tick.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Longest execution history kept, in days (100 years).
pub const MAX_RETENTION_DAYS: u32 = 36_500;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "backroom", "backroom-pos")
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file holding reports and execution history.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    data_dir().join("backroom.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Dispatcher Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherSettings {
    /// Seconds between due-report polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Due reports handled per poll.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Finished executions older than this many days are deleted.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_batch_size() -> u32 {
    20
}

fn default_retention_days() -> u32 {
    90
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        DispatcherSettings {
            poll_interval_secs: default_poll_interval(),
            batch_size: default_batch_size(),
            retention_days: default_retention_days(),
        }
    }
}

// =============================================================================
// Output Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Where rendered report documents are written.
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

fn default_output_dir() -> PathBuf {
    data_dir().join("reports")
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: default_output_dir(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete scheduler configuration.
///
/// ## Example Config File
/// ```toml
/// [database]
/// path = "/var/lib/backroom/backroom.db"
/// max_connections = 5
///
/// [dispatcher]
/// poll_interval_secs = 30
/// batch_size = 20
/// retention_days = 90
///
/// [output]
/// directory = "/var/lib/backroom/reports"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub dispatcher: DispatcherSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

impl SchedulerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> SchedulerResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scheduler config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| SchedulerError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.dispatcher.poll_interval_secs == 0 {
            return Err(SchedulerError::InvalidConfig(
                "poll_interval_secs must be at least 1".into(),
            ));
        }

        if self.dispatcher.batch_size == 0 || self.dispatcher.batch_size > MAX_BATCH_SIZE {
            return Err(SchedulerError::InvalidConfig(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.dispatcher.batch_size
            )));
        }

        if !(1..=MAX_RETENTION_DAYS).contains(&self.dispatcher.retention_days) {
            return Err(SchedulerError::InvalidConfig(format!(
                "retention_days must be between 1 and {}, got {}",
                MAX_RETENTION_DAYS, self.dispatcher.retention_days
            )));
        }

        if self.database.max_connections == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BACKROOM_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BACKROOM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("BACKROOM_OUTPUT_DIR") {
            debug!(dir = %dir, "Overriding output directory from environment");
            self.output.directory = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("BACKROOM_POLL_INTERVAL_SECS") {
            match raw.parse() {
                Ok(secs) => self.dispatcher.poll_interval_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid BACKROOM_POLL_INTERVAL_SECS"),
            }
        }

        if let Some(raw) = lookup("BACKROOM_BATCH_SIZE") {
            match raw.parse() {
                Ok(size) => self.dispatcher.batch_size = size,
                Err(_) => warn!(value = %raw, "Ignoring invalid BACKROOM_BATCH_SIZE"),
            }
        }

        if let Some(raw) = lookup("BACKROOM_RETENTION_DAYS") {
            match raw.parse() {
                Ok(days) => self.dispatcher.retention_days = days,
                Err(_) => warn!(value = %raw, "Ignoring invalid BACKROOM_RETENTION_DAYS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("scheduler.toml"))
    }

    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.dispatcher.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.dispatcher.poll_interval_secs, 30);
        assert_eq!(config.dispatcher.batch_size, 20);
        assert_eq!(config.dispatcher.retention_days, 90);
        assert!(config.database.path.ends_with("backroom.db"));
        assert!(config.output.directory.ends_with("reports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SchedulerConfig = toml::from_str(
            r#"
            [dispatcher]
            batch_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.dispatcher.batch_size, 50);
        assert_eq!(config.dispatcher.poll_interval_secs, 30);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [database]
            path = "/tmp/backroom-test.db"

            [dispatcher]
            poll_interval_secs = 5
            retention_days = 7
            "#
        )
        .unwrap();

        let config = SchedulerConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.dispatcher.retention_days, 7);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dispatcher\npoll_interval_secs = ").unwrap();

        let err = SchedulerConfig::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validation() {
        let mut config = SchedulerConfig::default();

        config.dispatcher.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        config.dispatcher.poll_interval_secs = 1;
        config.dispatcher.batch_size = 0;
        assert!(config.validate().is_err());

        config.dispatcher.batch_size = MAX_BATCH_SIZE + 1;
        assert!(config.validate().is_err());

        config.dispatcher.batch_size = MAX_BATCH_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retention_days_bounds() {
        let mut config = SchedulerConfig::default();

        config.dispatcher.retention_days = 0;
        assert!(config.validate().is_err());

        config.dispatcher.retention_days = MAX_RETENTION_DAYS;
        assert!(config.validate().is_ok());

        config.dispatcher.retention_days = MAX_RETENTION_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_retention_from_env_is_rejected() {
        let mut config = SchedulerConfig::default();
        config.apply_overrides(|key| (key == "BACKROOM_RETENTION_DAYS").then(|| u32::MAX.to_string()));

        assert_eq!(config.dispatcher.retention_days, u32::MAX);
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BACKROOM_DB_PATH", "/data/pos.db"),
            ("BACKROOM_OUTPUT_DIR", "/data/out"),
            ("BACKROOM_BATCH_SIZE", "100"),
            ("BACKROOM_POLL_INTERVAL_SECS", "soon"),
        ]);

        let mut config = SchedulerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/data/pos.db"));
        assert_eq!(config.output.directory, PathBuf::from("/data/out"));
        assert_eq!(config.dispatcher.batch_size, 100);
        assert_eq!(config.dispatcher.poll_interval_secs, 30);
    }
}
