//! # Error Types
//!
//! Domain-specific error types for backroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backroom-core errors (this file)                                      │
//! │  ├── CoreError        - Schedule calculation failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  backroom-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  report-scheduler errors (app)                                         │
//! │  └── SchedulerError   - Config, runner and dispatch failures           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → SchedulerError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation *findings* are not errors: `validate_scheduled_report` returns
//! a list of messages. They only become a [`ValidationError`] when a caller
//! decides to block a save on them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Schedule calculation errors.
///
/// These are configuration defects. They surface to the caller as hard
/// failures and are never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The schedule's frequency is not one of the five known cadences.
    ///
    /// ## When This Occurs
    /// - A stored row carries a frequency written by a newer/older client
    /// - Manual edits to the database
    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    /// `time` is not a valid `HH:MM` time of day.
    #[error("Invalid schedule time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// `timezone` is not a known IANA zone name.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A day/month field is outside its allowed range.
    #[error("{field} out of range: {value}")]
    InvalidScheduleField { field: &'static str, value: u8 },

    /// No valid occurrence was found within the search horizon.
    ///
    /// ## When This Occurs
    /// Practically never: only when date arithmetic leaves chrono's range.
    #[error("Could not find the next {frequency} occurrence")]
    ScheduleOverflow { frequency: String },

    /// The execution status string is not one of the four known states.
    #[error("Unknown execution status: {0}")]
    UnknownExecutionStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by callers that refuse to persist an incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// The scheduled report failed one or more configuration checks.
    #[error("Scheduled report is invalid: {}", issues.join("; "))]
    InvalidReport { issues: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
