//! # Scheduled Report Repository
//!
//! Persistence for [`ScheduledReport`] definitions.
//!
//! ## Save Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(new, now) / update_schedule(id, ..., now)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_report_name / validate_report_type                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ensure_valid(report)  ── any finding ──► DbError::Core(Validation)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next_run = calculate_next_run(schedule, now)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT / UPDATE scheduled_reports                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is the only writer of `is_active`, `last_run` and `next_run`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use backroom_core::validation::{ensure_valid, validate_report_name, validate_report_type};
use backroom_core::{
    DeliveryConfig, DeliveryMethod, Frequency, ScheduleConfig, ScheduledReport, DEFAULT_TENANT_ID,
};

const SELECT_REPORT: &str = r#"
    SELECT
        id, tenant_id, name, report_type,
        frequency, schedule_time, timezone, day_of_week, day_of_month, month_of_year,
        delivery_method, recipients, webhook_url, ftp_config,
        parameters, is_active, last_run, next_run,
        created_by, created_at, updated_at
    FROM scheduled_reports
"#;

// =============================================================================
// Input Type
// =============================================================================

/// Data needed to create a scheduled report.
#[derive(Debug, Clone)]
pub struct NewScheduledReport {
    pub name: String,
    pub report_type: String,
    pub schedule: ScheduleConfig,
    pub delivery: DeliveryConfig,
    pub parameters: Map<String, Value>,
    pub is_active: bool,
    pub created_by: String,
}

impl NewScheduledReport {
    /// An active report with no parameters.
    pub fn new(
        name: impl Into<String>,
        report_type: impl Into<String>,
        schedule: ScheduleConfig,
        delivery: DeliveryConfig,
        created_by: impl Into<String>,
    ) -> Self {
        NewScheduledReport {
            name: name.into(),
            report_type: report_type.into(),
            schedule,
            delivery,
            parameters: Map::new(),
            is_active: true,
            created_by: created_by.into(),
        }
    }

    /// Adds a report-type-specific parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, FromRow)]
struct ScheduledReportRow {
    id: String,
    tenant_id: String,
    name: String,
    report_type: String,
    frequency: String,
    schedule_time: String,
    timezone: String,
    day_of_week: Option<i64>,
    day_of_month: Option<i64>,
    month_of_year: Option<i64>,
    delivery_method: DeliveryMethod,
    recipients: Option<String>,
    webhook_url: Option<String>,
    ftp_config: Option<String>,
    parameters: String,
    is_active: bool,
    last_run: Option<DateTime<Utc>>,
    next_run: Option<DateTime<Utc>>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScheduledReportRow {
    fn small_int(&self, field: &str, value: Option<i64>) -> DbResult<Option<u8>> {
        value
            .map(|v| {
                u8::try_from(v).map_err(|_| DbError::CorruptRow {
                    entity: "scheduled_report",
                    id: self.id.clone(),
                    reason: format!("{field} = {v} does not fit a day/month"),
                })
            })
            .transpose()
    }
}

impl TryFrom<ScheduledReportRow> for ScheduledReport {
    type Error = DbError;

    fn try_from(row: ScheduledReportRow) -> DbResult<Self> {
        let schedule = ScheduleConfig {
            frequency: Frequency::from(row.frequency.as_str()),
            time: row.schedule_time.clone(),
            timezone: row.timezone.clone(),
            day_of_week: row.small_int("day_of_week", row.day_of_week)?,
            day_of_month: row.small_int("day_of_month", row.day_of_month)?,
            month_of_year: row.small_int("month_of_year", row.month_of_year)?,
        };

        let delivery = DeliveryConfig {
            method: row.delivery_method,
            recipients: row.recipients.as_deref().map(serde_json::from_str).transpose()?,
            webhook_url: row.webhook_url,
            ftp_config: row.ftp_config.as_deref().map(serde_json::from_str).transpose()?,
        };

        Ok(ScheduledReport {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            report_type: row.report_type,
            schedule,
            delivery,
            parameters: serde_json::from_str(&row.parameters)?,
            is_active: row.is_active,
            last_run: row.last_run,
            next_run: row.next_run,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_reports(rows: Vec<ScheduledReportRow>) -> DbResult<Vec<ScheduledReport>> {
    rows.into_iter().map(ScheduledReport::try_from).collect()
}

/// Validates a report and computes its next run from `now`.
fn prepare_for_save(report: &mut ScheduledReport, now: DateTime<Utc>) -> DbResult<()> {
    validate_report_name(&report.name)?;
    validate_report_type(&report.report_type)?;
    ensure_valid(report)?;

    report.next_run = Some(report.calculate_next_run(now)?);
    report.updated_at = now;
    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for scheduled report definitions.
#[derive(Debug, Clone)]
pub struct ScheduledReportRepository {
    pool: SqlitePool,
}

impl ScheduledReportRepository {
    /// Creates a new ScheduledReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ScheduledReportRepository { pool }
    }

    /// Validates and stores a new scheduled report.
    ///
    /// ## Returns
    /// The stored report, with a fresh UUID and `next_run` strictly after `now`.
    ///
    /// ## Errors
    /// - `DbError::Core(CoreError::Validation(..))` when the configuration has
    ///   any validation finding
    /// - `DbError::Core(..)` when the next run cannot be calculated
    pub async fn create(&self, new: NewScheduledReport, now: DateTime<Utc>) -> DbResult<ScheduledReport> {
        let mut report = ScheduledReport {
            id: Uuid::new_v4().to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: new.name.trim().to_string(),
            report_type: new.report_type,
            schedule: new.schedule,
            delivery: new.delivery,
            parameters: new.parameters,
            is_active: new.is_active,
            last_run: None,
            next_run: None,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };

        prepare_for_save(&mut report, now)?;

        debug!(
            name = %report.name,
            frequency = %report.schedule.frequency,
            next_run = ?report.next_run,
            "Creating scheduled report"
        );

        let recipients = report
            .delivery
            .recipients
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let ftp_config = report
            .delivery
            .ftp_config
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let parameters = serde_json::to_string(&report.parameters)?;

        sqlx::query(
            r#"
            INSERT INTO scheduled_reports (
                id, tenant_id, name, report_type,
                frequency, schedule_time, timezone, day_of_week, day_of_month, month_of_year,
                delivery_method, recipients, webhook_url, ftp_config,
                parameters, is_active, last_run, next_run,
                created_by, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18,
                ?19, ?20, ?21
            )
            "#,
        )
        .bind(&report.id)
        .bind(&report.tenant_id)
        .bind(&report.name)
        .bind(&report.report_type)
        .bind(report.schedule.frequency.as_str())
        .bind(&report.schedule.time)
        .bind(&report.schedule.timezone)
        .bind(report.schedule.day_of_week.map(i64::from))
        .bind(report.schedule.day_of_month.map(i64::from))
        .bind(report.schedule.month_of_year.map(i64::from))
        .bind(report.delivery.method)
        .bind(recipients)
        .bind(&report.delivery.webhook_url)
        .bind(ftp_config)
        .bind(parameters)
        .bind(report.is_active)
        .bind(report.last_run)
        .bind(report.next_run)
        .bind(&report.created_by)
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        info!(report_id = %report.id, name = %report.name, "Scheduled report created");
        Ok(report)
    }

    /// Gets a report by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(report))` - Report found
    /// * `Ok(None)` - Report not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ScheduledReport>> {
        let row = sqlx::query_as::<_, ScheduledReportRow>(&format!("{SELECT_REPORT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ScheduledReport::try_from).transpose()
    }

    /// Lists reports ordered by name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<ScheduledReport>> {
        let rows = sqlx::query_as::<_, ScheduledReportRow>(&format!(
            "{SELECT_REPORT} WHERE (?1 OR is_active = 1) ORDER BY name"
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        rows_to_reports(rows)
    }

    /// Active reports whose `next_run` has been reached, oldest first.
    ///
    /// ## Arguments
    /// * `now` - Reference time; `next_run <= now` is due
    /// * `limit` - Maximum reports to return (dispatcher batch size)
    pub async fn list_due(&self, now: DateTime<Utc>, limit: u32) -> DbResult<Vec<ScheduledReport>> {
        let rows = sqlx::query_as::<_, ScheduledReportRow>(&format!(
            r#"{SELECT_REPORT}
            WHERE is_active = 1
              AND next_run IS NOT NULL
              AND next_run <= ?1
            ORDER BY next_run ASC
            LIMIT ?2"#
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched due reports");
        rows_to_reports(rows)
    }

    /// Replaces a report's schedule and delivery, recomputing `next_run`.
    pub async fn update_schedule(
        &self,
        id: &str,
        schedule: ScheduleConfig,
        delivery: DeliveryConfig,
        now: DateTime<Utc>,
    ) -> DbResult<ScheduledReport> {
        let mut report = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("ScheduledReport", id))?;

        report.schedule = schedule;
        report.delivery = delivery;
        prepare_for_save(&mut report, now)?;

        let recipients = report
            .delivery
            .recipients
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let ftp_config = report
            .delivery
            .ftp_config
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE scheduled_reports SET
                frequency = ?2,
                schedule_time = ?3,
                timezone = ?4,
                day_of_week = ?5,
                day_of_month = ?6,
                month_of_year = ?7,
                delivery_method = ?8,
                recipients = ?9,
                webhook_url = ?10,
                ftp_config = ?11,
                next_run = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&report.id)
        .bind(report.schedule.frequency.as_str())
        .bind(&report.schedule.time)
        .bind(&report.schedule.timezone)
        .bind(report.schedule.day_of_week.map(i64::from))
        .bind(report.schedule.day_of_month.map(i64::from))
        .bind(report.schedule.month_of_year.map(i64::from))
        .bind(report.delivery.method)
        .bind(recipients)
        .bind(&report.delivery.webhook_url)
        .bind(ftp_config)
        .bind(report.next_run)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        info!(report_id = %report.id, next_run = ?report.next_run, "Schedule updated");
        Ok(report)
    }

    /// Activates or deactivates a report.
    ///
    /// Activation recomputes `next_run` from `now` so a long-paused report
    /// does not fire for a stale slot. Deactivation leaves it untouched.
    pub async fn set_active(&self, id: &str, active: bool, now: DateTime<Utc>) -> DbResult<ScheduledReport> {
        let mut report = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("ScheduledReport", id))?;

        if active && !report.is_active {
            prepare_for_save(&mut report, now)?;
        }
        report.is_active = active;
        report.updated_at = now;

        sqlx::query(
            r#"
            UPDATE scheduled_reports SET
                is_active = ?2,
                next_run = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&report.id)
        .bind(report.is_active)
        .bind(report.next_run)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await?;

        info!(report_id = %id, active, "Report activation changed");
        Ok(report)
    }

    /// Stamps a dispatched run: `last_run = ran_at`, `next_run = next_run`.
    ///
    /// `next_run = None` parks the report until its schedule is edited.
    pub async fn record_run(
        &self,
        id: &str,
        ran_at: DateTime<Utc>,
        next_run: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        debug!(report_id = %id, next_run = ?next_run, "Recording report run");

        let result = sqlx::query(
            r#"
            UPDATE scheduled_reports SET
                last_run = ?2,
                next_run = ?3,
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(ran_at)
        .bind(next_run)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ScheduledReport", id));
        }

        Ok(())
    }

    /// Deletes a report and (by cascade) its execution history.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM scheduled_reports WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ScheduledReport", id));
        }

        info!(report_id = %id, "Scheduled report deleted");
        Ok(())
    }

    /// Counts active reports (for diagnostics).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scheduled_reports WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use backroom_core::{CoreError, FtpConfig, ValidationError};
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    async fn repo() -> ScheduledReportRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().reports()
    }

    fn daily_sales() -> NewScheduledReport {
        NewScheduledReport::new(
            "Daily sales",
            "sales_summary",
            ScheduleConfig::daily("09:00", "UTC"),
            DeliveryConfig::email(["owner@example.com"]),
            "admin",
        )
        .with_parameter("storeId", "store-001")
    }

    #[tokio::test]
    async fn test_create_computes_next_run() {
        let repo = repo().await;
        let now = utc(2024, 6, 1, 10);

        let report = repo.create(daily_sales(), now).await.unwrap();
        assert_eq!(report.next_run, Some(utc(2024, 6, 2, 9)));
        assert_eq!(report.tenant_id, DEFAULT_TENANT_ID);

        let stored = repo.get_by_id(&report.id).await.unwrap().unwrap();
        assert_eq!(stored, report);
        assert_eq!(stored.parameters["storeId"], json!("store-001"));
    }

    #[tokio::test]
    async fn test_create_round_trips_ftp_and_optional_days() {
        let repo = repo().await;
        let new = NewScheduledReport::new(
            "Quarterly tax",
            "tax_summary",
            ScheduleConfig::yearly(4, 15, "06:30", "Europe/London"),
            DeliveryConfig::ftp(FtpConfig {
                host: "ftp.example.com".to_string(),
                port: 2121,
                username: "acct".to_string(),
                password: None,
                directory: Some("/incoming".to_string()),
            }),
            "admin",
        );

        let report = repo.create(new, utc(2024, 1, 1, 0)).await.unwrap();
        let stored = repo.get_by_id(&report.id).await.unwrap().unwrap();
        assert_eq!(stored.schedule.month_of_year, Some(4));
        assert_eq!(stored.schedule.day_of_week, None);
        assert_eq!(stored.delivery.ftp_config.unwrap().port, 2121);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_configuration() {
        let repo = repo().await;
        let mut new = daily_sales();
        new.schedule = ScheduleConfig::weekly(1, "09:00", "UTC");
        new.schedule.day_of_week = None;
        new.delivery = DeliveryConfig::email(Vec::<String>::new());

        let err = repo.create(new, utc(2024, 6, 1, 10)).await.unwrap_err();
        match err {
            DbError::Core(CoreError::Validation(ValidationError::InvalidReport { issues })) => {
                assert_eq!(
                    issues,
                    vec![
                        "Day of week is required for weekly schedules".to_string(),
                        "At least one email recipient is required".to_string(),
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(repo.list(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let repo = repo().await;
        let mut new = daily_sales();
        new.name = "  ".to_string();
        assert!(repo.create(new, utc(2024, 6, 1, 10)).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_list_due_filters_and_orders() {
        let repo = repo().await;
        let created = utc(2024, 6, 1, 0);

        let early = repo.create(daily_sales(), created).await.unwrap(); // 2024-06-01 09:00
        let mut later = daily_sales();
        later.name = "Evening close".to_string();
        later.schedule = ScheduleConfig::daily("18:00", "UTC");
        let later = repo.create(later, created).await.unwrap(); // 2024-06-01 18:00
        let mut paused = daily_sales();
        paused.name = "Paused".to_string();
        paused.is_active = false;
        repo.create(paused, created).await.unwrap();

        assert!(repo.list_due(utc(2024, 6, 1, 8), 10).await.unwrap().is_empty());

        let due: Vec<String> = repo
            .list_due(utc(2024, 6, 1, 20), 10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(due, vec![early.id.clone(), later.id]);

        let limited = repo.list_due(utc(2024, 6, 1, 20), 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, early.id);

        assert_eq!(repo.list(false).await.unwrap().len(), 2);
        assert_eq!(repo.list(true).await.unwrap().len(), 3);
        assert_eq!(repo.count_active().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_schedule_recomputes_next_run() {
        let repo = repo().await;
        let report = repo.create(daily_sales(), utc(2024, 6, 1, 10)).await.unwrap();

        let updated = repo
            .update_schedule(
                &report.id,
                ScheduleConfig::monthly(15, "08:00", "UTC"),
                DeliveryConfig::webhook("https://hooks.example.com/sales"),
                utc(2024, 6, 3, 0),
            )
            .await
            .unwrap();

        assert_eq!(updated.next_run, Some(utc(2024, 6, 15, 8)));
        let stored = repo.get_by_id(&report.id).await.unwrap().unwrap();
        assert_eq!(stored.delivery.method, DeliveryMethod::Webhook);
        assert_eq!(stored.delivery.recipients, None);
        assert_eq!(stored.next_run.unwrap().day(), 15);
    }

    #[tokio::test]
    async fn test_update_schedule_missing_report() {
        let repo = repo().await;
        let err = repo
            .update_schedule(
                "nope",
                ScheduleConfig::daily("09:00", "UTC"),
                DeliveryConfig::email(["a@example.com"]),
                utc(2024, 6, 1, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reactivation_recomputes_next_run() {
        let repo = repo().await;
        let report = repo.create(daily_sales(), utc(2024, 6, 1, 10)).await.unwrap();

        let paused = repo.set_active(&report.id, false, utc(2024, 6, 1, 11)).await.unwrap();
        assert!(!paused.is_active);
        assert_eq!(paused.next_run, report.next_run);

        let resumed = repo.set_active(&report.id, true, utc(2024, 7, 1, 12)).await.unwrap();
        assert!(resumed.is_active);
        assert_eq!(resumed.next_run, Some(utc(2024, 7, 2, 9)));
    }

    #[tokio::test]
    async fn test_record_run_and_delete() {
        let repo = repo().await;
        let report = repo.create(daily_sales(), utc(2024, 6, 1, 10)).await.unwrap();

        repo.record_run(&report.id, utc(2024, 6, 2, 9), Some(utc(2024, 6, 3, 9)))
            .await
            .unwrap();
        let stored = repo.get_by_id(&report.id).await.unwrap().unwrap();
        assert_eq!(stored.last_run, Some(utc(2024, 6, 2, 9)));
        assert_eq!(stored.next_run, Some(utc(2024, 6, 3, 9)));

        repo.delete(&report.id).await.unwrap();
        assert!(repo.get_by_id(&report.id).await.unwrap().is_none());
        assert!(matches!(
            repo.record_run(&report.id, utc(2024, 6, 3, 9), None).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.delete(&report.id).await, Err(DbError::NotFound { .. })));
    }
}
