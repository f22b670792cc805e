//! # Repository Module
//!
//! Database repository implementations for the report store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Dispatcher / Admin API                                                │
//! │       │                                                                 │
//! │       │  db.reports().list_due(now, 20)                                │
//! │       ▼                                                                 │
//! │  ScheduledReportRepository                                             │
//! │  ├── create(new, now)          ← validates + computes next_run         │
//! │  ├── update_schedule(...)      ← validates + recomputes next_run       │
//! │  ├── set_active / record_run / delete                                  │
//! │  └── get_by_id / list / list_due                                       │
//! │                                                                         │
//! │  ExecutionRepository                                                   │
//! │  ├── insert / update / get_by_id                                       │
//! │  ├── list_for_report / list_unfinished / count_by_status               │
//! │  └── cleanup_older_than(days, now)                                     │
//! │       │                                                                 │
//! │       ▼  SQL                                                            │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into private `*Row` structs and converted into the
//! `backroom-core` types, so JSON columns and small integers are checked
//! on the way out.

pub mod execution;
pub mod report;
