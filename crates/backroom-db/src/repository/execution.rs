//! # Execution Repository
//!
//! Execution history for scheduled reports.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(pending) ──► update(running) ──► update(completed | failed)    │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                        cleanup_older_than(retention_days, now)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are built by `backroom_core::execution`; this module only stores
//! them. Only finished executions are ever removed by retention cleanup.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use backroom_core::{ExecutionStatus, ReportExecution};

const SELECT_EXECUTION: &str = r#"
    SELECT id, report_id, status, start_time, end_time, output_url, error_message, details
    FROM report_executions
"#;

#[derive(Debug, FromRow)]
struct ExecutionRow {
    id: String,
    report_id: String,
    status: ExecutionStatus,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    output_url: Option<String>,
    error_message: Option<String>,
    details: String,
}

impl TryFrom<ExecutionRow> for ReportExecution {
    type Error = DbError;

    fn try_from(row: ExecutionRow) -> DbResult<Self> {
        let details = serde_json::from_str(&row.details).map_err(|e| DbError::CorruptRow {
            entity: "report_execution",
            id: row.id.clone(),
            reason: format!("details: {e}"),
        })?;

        Ok(ReportExecution {
            id: row.id,
            report_id: row.report_id,
            status: row.status,
            start_time: row.start_time,
            end_time: row.end_time,
            output_url: row.output_url,
            error_message: row.error_message,
            details,
        })
    }
}

fn rows_to_executions(rows: Vec<ExecutionRow>) -> DbResult<Vec<ReportExecution>> {
    rows.into_iter().map(ReportExecution::try_from).collect()
}

/// Repository for report execution history.
#[derive(Debug, Clone)]
pub struct ExecutionRepository {
    pool: SqlitePool,
}

impl ExecutionRepository {
    /// Creates a new ExecutionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExecutionRepository { pool }
    }

    /// Stores a new execution record.
    ///
    /// ## Errors
    /// - `DbError::ForeignKeyViolation` if the report does not exist
    /// - `DbError::UniqueViolation` if the ID was already used
    pub async fn insert(&self, execution: &ReportExecution) -> DbResult<()> {
        debug!(
            execution_id = %execution.id,
            report_id = %execution.report_id,
            status = %execution.status,
            "Inserting execution"
        );

        sqlx::query(
            r#"
            INSERT INTO report_executions (
                id, report_id, status, start_time, end_time, output_url, error_message, details
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&execution.id)
        .bind(&execution.report_id)
        .bind(execution.status)
        .bind(execution.start_time)
        .bind(execution.end_time)
        .bind(&execution.output_url)
        .bind(&execution.error_message)
        .bind(serde_json::to_string(&execution.details)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites the mutable fields of a stored execution.
    ///
    /// `report_id` and `start_time` are fixed at insert time.
    pub async fn update(&self, execution: &ReportExecution) -> DbResult<()> {
        debug!(
            execution_id = %execution.id,
            status = %execution.status,
            "Updating execution"
        );

        let result = sqlx::query(
            r#"
            UPDATE report_executions SET
                status = ?2,
                end_time = ?3,
                output_url = ?4,
                error_message = ?5,
                details = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&execution.id)
        .bind(execution.status)
        .bind(execution.end_time)
        .bind(&execution.output_url)
        .bind(&execution.error_message)
        .bind(serde_json::to_string(&execution.details)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ReportExecution", &execution.id));
        }

        Ok(())
    }

    /// Gets an execution by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ReportExecution>> {
        let row = sqlx::query_as::<_, ExecutionRow>(&format!("{SELECT_EXECUTION} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReportExecution::try_from).transpose()
    }

    /// Most recent executions of a report, newest first.
    pub async fn list_for_report(&self, report_id: &str, limit: u32) -> DbResult<Vec<ReportExecution>> {
        let rows = sqlx::query_as::<_, ExecutionRow>(&format!(
            "{SELECT_EXECUTION} WHERE report_id = ?1 ORDER BY start_time DESC, id DESC LIMIT ?2"
        ))
        .bind(report_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows_to_executions(rows)
    }

    /// Executions still `pending` or `running`, oldest first.
    ///
    /// After a restart these are runs that were interrupted mid-flight.
    pub async fn list_unfinished(&self) -> DbResult<Vec<ReportExecution>> {
        let rows = sqlx::query_as::<_, ExecutionRow>(&format!(
            "{SELECT_EXECUTION} WHERE status IN ('pending', 'running') ORDER BY start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows_to_executions(rows)
    }

    /// Counts executions in a given status.
    pub async fn count_by_status(&self, status: ExecutionStatus) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM report_executions WHERE status = ?1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes finished executions that ended more than `days` before `now`.
    ///
    /// ## Returns
    /// Number of executions removed.
    ///
    /// ## Errors
    /// - `DbError::Internal` if the retention window reaches past the
    ///   representable date range
    pub async fn cleanup_older_than(&self, days: u32, now: DateTime<Utc>) -> DbResult<u64> {
        let cutoff = Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                DbError::Internal(format!("Retention window of {days} days is out of range"))
            })?;

        let result = sqlx::query(
            r#"
            DELETE FROM report_executions
            WHERE status IN ('completed', 'failed')
              AND end_time IS NOT NULL
              AND end_time < ?1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted, cutoff = %cutoff, "Cleaned up old executions");
        }

        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
