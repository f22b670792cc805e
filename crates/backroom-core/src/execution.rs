//! # Execution Records
//!
//! Creation and status transitions of [`ReportExecution`] values.
//!
//! ## Lifecycle
//! ```text
//! create_execution_record()          update_execution_record(...)
//!          │                                    │
//!          ▼                                    ▼
//!      ┌────────┐   running   ┌─────────┐   completed / failed   ┌──────────┐
//!      │pending │ ──────────► │ running │ ─────────────────────► │ terminal │
//!      └────────┘             └─────────┘                        └──────────┘
//!   end_time: None         end_time: None                     end_time: now
//! ```
//!
//! Transitions are not guarded. Re-entering `running` after a terminal
//! state clears `end_time`, so `end_time` is "last finished", not "first
//! finished". Updates never mutate their input.

use chrono::{DateTime, Utc};
use serde_json::Map;
use uuid::Uuid;

use crate::types::{ExecutionStatus, ExecutionUpdate, ReportExecution};
use crate::EXECUTION_ID_PREFIX;

/// Generates a fresh execution ID: `exec_` + 32 random hex characters.
pub fn generate_execution_id() -> String {
    format!("{}{}", EXECUTION_ID_PREFIX, Uuid::new_v4().simple())
}

/// Creates a pending execution record for `report_id`, started at `now`.
pub fn create_execution_record(report_id: &str, now: DateTime<Utc>) -> ReportExecution {
    ReportExecution {
        id: generate_execution_id(),
        report_id: report_id.to_string(),
        status: ExecutionStatus::Pending,
        start_time: now,
        end_time: None,
        output_url: None,
        error_message: None,
        details: Map::new(),
    }
}

/// Returns a copy of `execution` moved to `status`.
///
/// ## Merge Rules
/// - `update.output_url` / `update.error_message`: replace when `Some`
/// - `update.details`: merged over the previous details, key by key
/// - `end_time`: `now` for every status except `running`, which clears it
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use backroom_core::execution::{create_execution_record, update_execution_record};
/// use backroom_core::types::{ExecutionStatus, ExecutionUpdate};
///
/// let now = Utc::now();
/// let exec = create_execution_record("report_1", now);
/// let done = update_execution_record(
///     &exec,
///     ExecutionStatus::Completed,
///     ExecutionUpdate::default().with_output_url("https://x/y.pdf"),
///     now,
/// );
///
/// assert_eq!(done.status, ExecutionStatus::Completed);
/// assert_eq!(done.end_time, Some(now));
/// assert_eq!(exec.status, ExecutionStatus::Pending); // input untouched
/// ```
pub fn update_execution_record(
    execution: &ReportExecution,
    status: ExecutionStatus,
    update: ExecutionUpdate,
    now: DateTime<Utc>,
) -> ReportExecution {
    let mut next = execution.clone();

    if let Some(url) = update.output_url {
        next.output_url = Some(url);
    }
    if let Some(message) = update.error_message {
        next.error_message = Some(message);
    }
    next.details.extend(update.details);

    next.status = status;
    next.end_time = match status {
        ExecutionStatus::Running => None,
        _ => Some(now),
    };

    next
}

/// Display text for a raw status string; unknown values read `"Unknown"`.
pub fn execution_status_text(status: &str) -> &'static str {
    status
        .parse::<ExecutionStatus>()
        .map(|status| status.label())
        .unwrap_or("Unknown")
}

// =============================================================================
// Unit Tests
// =============================================================================
