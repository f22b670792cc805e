//! # Scheduler Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Persistence   │  │     Execution           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Database       │  │  Schedule (core)        │ │
//! │  │  ConfigLoad     │  │                 │  │  Runner                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backroom_core::CoreError;
use backroom_db::DbError;
use thiserror::Error;

use crate::runner::RunnerError;

/// Result type alias for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Everything the dispatcher can fail with.
#[derive(Debug, Error)]
pub enum SchedulerError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid scheduler configuration.
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Persistence / Domain Errors
    // =========================================================================
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] CoreError),

    // =========================================================================
    // Execution Errors
    // =========================================================================
    #[error("Report runner failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dispatcher is shutting down.
    #[error("Dispatcher is shutting down")]
    ShuttingDown,
}

impl From<toml::de::Error> for SchedulerError {
    fn from(err: toml::de::Error) -> Self {
        SchedulerError::ConfigLoadFailed(err.to_string())
    }
}

impl SchedulerError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidConfig(_) | SchedulerError::ConfigLoadFailed(_)
        )
    }
}
