//! # backroom-db: Database Layer for Backroom POS Reports
//!
//! Stores scheduled reports and their execution history in SQLite, using
//! sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Backroom Reports Data Flow                          │
//! │                                                                         │
//! │  report-scheduler (dispatcher tick)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  backroom-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │    Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │    │                     │  │ (embedded) │ │   │
//! │  │   │               │    │ ScheduledReportRepo │  │            │ │   │
//! │  │   │  SqlitePool   │◄───│ ExecutionRepo       │  │ 001_...sql │ │   │
//! │  │   └───────────────┘    └──────────┬──────────┘  └────────────┘ │   │
//! │  │                                   │ next_run, validation        │   │
//! │  │                                   ▼                             │   │
//! │  │                           backroom-core                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (backroom.db)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Scheduled report and execution repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("backroom.db")).await?;
//! let due = db.reports().list_due(Utc::now(), 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::execution::ExecutionRepository;
pub use repository::report::{NewScheduledReport, ScheduledReportRepository};
