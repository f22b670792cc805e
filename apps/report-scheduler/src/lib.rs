//! # Backroom Report Scheduler
//!
//! Dispatcher daemon for scheduled back-office reports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Report Scheduler                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  config        │  │  dispatcher    │  │  runner                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • TOML file    │  │ • tick(now)    │  │ • ReportRunner trait       ││
//! │  │ • BACKROOM_*   │─►│ • run loop     │─►│ • FileOutputRunner         ││
//! │  │ • validate     │  │ • retention    │  │                            ││
//! │  └────────────────┘  └───────┬────────┘  └────────────────────────────┘│
//! │                              │                                          │
//! │                              ▼                                          │
//! │                 backroom-db (SQLite) + backroom-core (date math)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod runner;

pub use config::SchedulerConfig;
pub use dispatcher::{Clock, Dispatcher, DispatcherHandle, TickSummary};
pub use error::{SchedulerError, SchedulerResult};
pub use runner::{FileOutputRunner, ReportRunner, RunnerError};
