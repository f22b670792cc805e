//! # Report Dispatcher
//!
//! Polls for due reports, runs them, and records the outcome.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Dispatcher Tick                                    │
//! │                                                                         │
//! │  list_due(now, batch_size)                                             │
//! │       │                                                                 │
//! │       ▼  for each report                                                │
//! │  create_execution_record ──► insert (pending, start_time = now)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  record_run(id, now, next_run)        claims the slot                  │
//! │       │                                                                 │
//! │       ├── calculate_next_run failed ──► failed, next_run = NULL        │
//! │       │                                 (parked until edited)          │
//! │       ▼                                                                 │
//! │  update_execution_record(running) ──► update                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  runner.run(report, execution)                                         │
//! │       │                                                                 │
//! │       ├── Ok  ──► completed (output_url, details)                      │
//! │       └── Err ──► failed (error_message)                               │
//! │                   end_time = clock()                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `next_run` is always computed from the tick time, so a report that
//! missed several slots while the scheduler was down fires once, not once
//! per missed slot.
//!
//! The slot is claimed before the runner is called. If the final execution
//! write fails, the report has already moved on and is not delivered a
//! second time; the execution row stays `running` until the next restart
//! marks it interrupted.
//!
//! ## Timing
//! - Poll interval: 30 seconds (configurable)
//! - Batch size: 20 reports per tick (configurable)
//! - Retention cleanup: at most once per day

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use backroom_core::execution::{create_execution_record, update_execution_record};
use backroom_core::{ExecutionStatus, ExecutionUpdate, ScheduledReport};
use backroom_db::Database;

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::runner::ReportRunner;

/// Error text stored on executions abandoned by a previous process.
pub const INTERRUPTED_MESSAGE: &str = "Interrupted by scheduler restart";

/// Source of the current time for execution end stamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

// =============================================================================
// Tick Summary
// =============================================================================

/// What one dispatcher tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Reports returned by the due query.
    pub due: usize,
    pub completed: usize,
    pub failed: usize,
    /// Due reports not run this tick (storage error, or no longer due).
    /// A report whose slot was never claimed stays due for the next tick.
    pub skipped: usize,
}

enum Outcome {
    Completed,
    Failed,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Fires scheduled reports when they come due.
pub struct Dispatcher {
    db: Database,
    runner: Arc<dyn ReportRunner>,
    clock: Clock,
    batch_size: u32,
    poll_interval: Duration,
    retention_days: u32,
    last_cleanup: Option<DateTime<Utc>>,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for stopping a running dispatcher.
#[derive(Clone)]
pub struct DispatcherHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl DispatcherHandle {
    /// Triggers graceful shutdown; the current tick finishes first.
    pub async fn shutdown(&self) -> SchedulerResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SchedulerError::ShuttingDown)
    }
}

impl Dispatcher {
    /// Creates a dispatcher and the handle that stops it.
    pub fn new(
        db: Database,
        runner: Arc<dyn ReportRunner>,
        config: &SchedulerConfig,
    ) -> (Self, DispatcherHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let dispatcher = Dispatcher {
            db,
            runner,
            clock: Arc::new(Utc::now),
            batch_size: config.dispatcher.batch_size,
            poll_interval: config.poll_interval(),
            retention_days: config.dispatcher.retention_days,
            last_cleanup: None,
            shutdown_rx,
        };

        (dispatcher, DispatcherHandle { shutdown_tx })
    }

    /// Replaces the wall clock used for execution end stamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current time, never earlier than `floor`.
    fn now_at_least(&self, floor: DateTime<Utc>) -> DateTime<Utc> {
        (self.clock)().max(floor)
    }

    /// Runs the dispatcher loop until shutdown.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            batch_size = self.batch_size,
            "Report dispatcher starting"
        );

        match self.recover_interrupted((self.clock)()).await {
            Ok(0) => {}
            Ok(count) => warn!(count, "Marked interrupted executions as failed"),
            Err(e) => error!(?e, "Failed to recover interrupted executions"),
        }

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = (self.clock)();

                    match self.tick(now).await {
                        Ok(summary) if summary.due > 0 => info!(
                            due = summary.due,
                            completed = summary.completed,
                            failed = summary.failed,
                            skipped = summary.skipped,
                            "Dispatcher tick finished"
                        ),
                        Ok(_) => debug!("No reports due"),
                        Err(e) => error!(?e, "Dispatcher tick failed"),
                    }

                    if let Err(e) = self.cleanup_if_due(now).await {
                        error!(?e, "Execution retention cleanup failed");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Report dispatcher shutting down");
                    break;
                }
            }
        }

        info!("Report dispatcher stopped");
    }

    /// Runs every report due at `now`, one at a time.
    ///
    /// A storage failure on one report is logged and counted as skipped;
    /// the rest of the batch still runs.
    pub async fn tick(&self, now: DateTime<Utc>) -> SchedulerResult<TickSummary> {
        let reports = self.db.reports().list_due(now, self.batch_size).await?;

        let mut summary = TickSummary {
            due: reports.len(),
            ..TickSummary::default()
        };

        for report in &reports {
            if !report.is_due(now) {
                summary.skipped += 1;
                continue;
            }

            match self.dispatch(report, now).await {
                Ok(Outcome::Completed) => summary.completed += 1,
                Ok(Outcome::Failed) => summary.failed += 1,
                Err(e) => {
                    error!(report_id = %report.id, ?e, "Failed to dispatch report");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn dispatch(&self, report: &ScheduledReport, now: DateTime<Utc>) -> SchedulerResult<Outcome> {
        let executions = self.db.executions();

        let pending = create_execution_record(&report.id, now);
        executions.insert(&pending).await?;

        let next_run = report.calculate_next_run(now);
        if let Err(e) = self
            .db
            .reports()
            .record_run(&report.id, now, next_run.as_ref().ok().copied())
            .await
        {
            let abandoned = update_execution_record(
                &pending,
                ExecutionStatus::Failed,
                ExecutionUpdate::default().with_error(e.to_string()),
                self.now_at_least(now),
            );
            if let Err(cleanup) = executions.update(&abandoned).await {
                warn!(execution_id = %pending.id, error = %cleanup, "Could not fail unclaimed execution");
            }
            return Err(e.into());
        }

        let next_run = match next_run {
            Ok(next) => next,
            Err(e) => {
                error!(report_id = %report.id, error = %e, "Schedule cannot be calculated, parking report");

                let failed = update_execution_record(
                    &pending,
                    ExecutionStatus::Failed,
                    ExecutionUpdate::default().with_error(e.to_string()),
                    self.now_at_least(now),
                );
                executions.update(&failed).await?;
                return Ok(Outcome::Failed);
            }
        };

        let running = update_execution_record(
            &pending,
            ExecutionStatus::Running,
            ExecutionUpdate::default(),
            self.now_at_least(now),
        );
        executions.update(&running).await?;

        debug!(
            report_id = %report.id,
            execution_id = %running.id,
            "Running scheduled report"
        );

        let result = self.runner.run(report, &running).await;
        let finished_at = self.now_at_least(now);

        let (finished, outcome) = match result {
            Ok(update) => (
                update_execution_record(&running, ExecutionStatus::Completed, update, finished_at),
                Outcome::Completed,
            ),
            Err(e) => {
                warn!(report_id = %report.id, error = %e, "Report run failed");
                (
                    update_execution_record(
                        &running,
                        ExecutionStatus::Failed,
                        ExecutionUpdate::default().with_error(e.to_string()),
                        finished_at,
                    ),
                    Outcome::Failed,
                )
            }
        };

        if let Err(e) = executions.update(&finished).await {
            error!(
                report_id = %report.id,
                execution_id = %finished.id,
                status = %finished.status,
                error = %e,
                "Report ran but its outcome could not be stored"
            );
            return Err(e.into());
        }

        info!(
            report_id = %report.id,
            execution_id = %finished.id,
            status = %finished.status,
            next_run = %next_run,
            "Scheduled report dispatched"
        );

        Ok(outcome)
    }

    /// Fails executions a previous process left `pending` or `running`.
    pub async fn recover_interrupted(&self, now: DateTime<Utc>) -> SchedulerResult<usize> {
        let executions = self.db.executions();
        let stale = executions.list_unfinished().await?;

        for execution in &stale {
            let failed = update_execution_record(
                execution,
                ExecutionStatus::Failed,
                ExecutionUpdate::default().with_error(INTERRUPTED_MESSAGE),
                now,
            );
            executions.update(&failed).await?;
        }

        Ok(stale.len())
    }

    /// Deletes old finished executions, at most once per day.
    pub async fn cleanup_if_due(&mut self, now: DateTime<Utc>) -> SchedulerResult<u64> {
        if let Some(last) = self.last_cleanup {
            if now - last < chrono::Duration::days(1) {
                return Ok(0);
            }
        }

        let deleted = self
            .db
            .executions()
            .cleanup_older_than(self.retention_days, now)
            .await?;
        self.last_cleanup = Some(now);

        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
