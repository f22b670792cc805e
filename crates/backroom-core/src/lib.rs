//! # backroom-core: Pure Report Scheduling Logic for Backroom POS
//!
//! This crate is the scheduling **heart** of the back office. It decides
//! when a recurring report fires next, whether its configuration is
//! complete, how to describe it to a human, and how an execution record
//! moves through its lifecycle. Everything is a pure function.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Backroom Reports Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Back-office UI / Admin API                     │   │
//! │  │   Schedule form ──► Preview ("Every Monday at 9:00 AM ...")     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ backroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ schedule  │  │ describe  │  │ execution │  │   │
//! │  │   │ Schedule  │  │ next run  │  │  "Daily   │  │  pending  │  │   │
//! │  │   │ Delivery  │  │ upcoming  │  │  at 9 AM" │  │  running  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                       ┌────────────┐                           │   │
//! │  │                       │ validation │                           │   │
//! │  │                       └────────────┘                           │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        backroom-db (SQLite)  ◄──  report-scheduler (tokio)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Scheduled report, delivery and execution types
//! - [`schedule`] - Next-run calculation and upcoming run previews
//! - [`describe`] - Human-readable schedule sentences
//! - [`validation`] - Completeness checks for report configuration
//! - [`execution`] - Execution record creation and status transitions
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Explicit Time**: every function that needs "now" takes it as a parameter
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Tolerant Calculation, Strict Validation**: missing optional fields get
//!    defaults when calculating, but are reported when validating
//! 4. **Display Never Fails**: descriptions degrade to `"Invalid schedule"`
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use backroom_core::schedule::calculate_next_run;
//! use backroom_core::describe::schedule_description;
//! use backroom_core::types::ScheduleConfig;
//!
//! let schedule = ScheduleConfig::daily("09:00", "America/New_York");
//! let now = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap(); // 07:00 in New York
//!
//! let next = calculate_next_run(&schedule, now).unwrap();
//! assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 4, 14, 0, 0).unwrap());
//! assert_eq!(schedule_description(&schedule), "Daily at 9:00 AM America/New_York");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod describe;
pub mod error;
pub mod execution;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID (single-tenant runtime with multi-tenant schema).
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Prefix of every generated execution record ID (`exec_<32 hex chars>`).
pub const EXECUTION_ID_PREFIX: &str = "exec_";

/// Maximum length of a scheduled report's display name.
pub const MAX_REPORT_NAME_LEN: usize = 200;
