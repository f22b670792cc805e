//! # Domain Types
//!
//! Types describing a recurring report and its executions.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │              ScheduledReport                 │                      │
//! │  │  ──────────────────────────────────────────  │                      │
//! │  │  id, name, report_type, parameters (opaque)  │                      │
//! │  │  is_active, last_run, next_run               │                      │
//! │  │   │                                          │                      │
//! │  │   ├── schedule: ScheduleConfig               │                      │
//! │  │   │     frequency, time, timezone,           │                      │
//! │  │   │     day_of_week?, day_of_month?,         │                      │
//! │  │   │     month_of_year?                       │                      │
//! │  │   │                                          │                      │
//! │  │   └── delivery: DeliveryConfig               │                      │
//! │  │         method, recipients?, webhook_url?,   │                      │
//! │  │         ftp_config?                          │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! │                        │ 1..n                                           │
//! │                        ▼                                                │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │              ReportExecution                 │                      │
//! │  │  id ("exec_..."), report_id, status,         │                      │
//! │  │  start_time, end_time?, output_url?, ...     │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase (`dayOfWeek`, `nextRun`, `outputUrl`)
//! to match the back-office frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Frequency
// =============================================================================

/// Recurrence cadence of a scheduled report.
///
/// ## Why an `Unsupported` variant?
/// Frequencies are stored as plain text. A value this build does not know
/// must still load, so that `calculate_next_run` can report it as
/// [`CoreError::UnsupportedFrequency`] and the description helper can
/// render `"Invalid schedule"` instead of the whole row failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    /// Any value outside the five known cadences, kept verbatim.
    Unsupported(String),
}

impl Frequency {
    /// Returns the stored/serialized form.
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::Unsupported(other) => other,
        }
    }

    /// Returns true for the five cadences the calculator understands.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Frequency::Unsupported(_))
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        match value {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "yearly" => Frequency::Yearly,
            other => Frequency::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Frequency::from(value.as_str())
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Unsupported(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Schedule Configuration
// =============================================================================

/// When a report runs.
///
/// ## Field Conventions
/// - `time`: 24-hour `"HH:MM"` wall-clock time in `timezone`
/// - `timezone`: IANA name, e.g. `"America/New_York"`
/// - `day_of_week`: 0 = Sunday .. 6 = Saturday (weekly)
/// - `day_of_month`: 1..31 (monthly, quarterly, yearly)
/// - `month_of_year`: 1..12 (yearly)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    #[ts(type = "\"daily\" | \"weekly\" | \"monthly\" | \"quarterly\" | \"yearly\"")]
    pub frequency: Frequency,
    pub time: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_of_year: Option<u8>,
}

impl ScheduleConfig {
    fn new(frequency: Frequency, time: &str, timezone: &str) -> Self {
        ScheduleConfig {
            frequency,
            time: time.to_string(),
            timezone: timezone.to_string(),
            day_of_week: None,
            day_of_month: None,
            month_of_year: None,
        }
    }

    /// Every day at `time`.
    pub fn daily(time: &str, timezone: &str) -> Self {
        Self::new(Frequency::Daily, time, timezone)
    }

    /// Every week on `day_of_week` (0 = Sunday).
    pub fn weekly(day_of_week: u8, time: &str, timezone: &str) -> Self {
        ScheduleConfig {
            day_of_week: Some(day_of_week),
            ..Self::new(Frequency::Weekly, time, timezone)
        }
    }

    /// Every month on `day_of_month`.
    pub fn monthly(day_of_month: u8, time: &str, timezone: &str) -> Self {
        ScheduleConfig {
            day_of_month: Some(day_of_month),
            ..Self::new(Frequency::Monthly, time, timezone)
        }
    }

    /// First month of every calendar quarter on `day_of_month`.
    pub fn quarterly(day_of_month: u8, time: &str, timezone: &str) -> Self {
        ScheduleConfig {
            day_of_month: Some(day_of_month),
            ..Self::new(Frequency::Quarterly, time, timezone)
        }
    }

    /// Once a year on `month_of_year`/`day_of_month`.
    pub fn yearly(month_of_year: u8, day_of_month: u8, time: &str, timezone: &str) -> Self {
        ScheduleConfig {
            day_of_month: Some(day_of_month),
            month_of_year: Some(month_of_year),
            ..Self::new(Frequency::Yearly, time, timezone)
        }
    }
}

// =============================================================================
// Delivery Configuration
// =============================================================================

/// How a finished report leaves the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Webhook,
    Ftp,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Email => write!(f, "email"),
            DeliveryMethod::Webhook => write!(f, "webhook"),
            DeliveryMethod::Ftp => write!(f, "ftp"),
        }
    }
}

fn default_ftp_port() -> u16 {
    21
}

/// FTP upload target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FtpConfig {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Delivery target. Only the field matching `method` is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfig {
    pub method: DeliveryMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp_config: Option<FtpConfig>,
}

impl DeliveryConfig {
    /// Email delivery to the given recipients.
    pub fn email<I, S>(recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DeliveryConfig {
            method: DeliveryMethod::Email,
            recipients: Some(recipients.into_iter().map(Into::into).collect()),
            webhook_url: None,
            ftp_config: None,
        }
    }

    /// Webhook delivery (HTTP POST) to `url`.
    pub fn webhook(url: &str) -> Self {
        DeliveryConfig {
            method: DeliveryMethod::Webhook,
            recipients: None,
            webhook_url: Some(url.to_string()),
            ftp_config: None,
        }
    }

    /// FTP upload.
    pub fn ftp(config: FtpConfig) -> Self {
        DeliveryConfig {
            method: DeliveryMethod::Ftp,
            recipients: None,
            webhook_url: None,
            ftp_config: Some(config),
        }
    }
}

// =============================================================================
// Scheduled Report
// =============================================================================

/// A recurring report definition.
///
/// `is_active`, `last_run` and `next_run` are owned by the store; this crate
/// only computes replacement values for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReport {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// Report kind understood by the runner ("sales_summary", "inventory", ...).
    pub report_type: String,
    pub schedule: ScheduleConfig,
    pub delivery: DeliveryConfig,
    /// Report-type-specific options, opaque to scheduling.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub parameters: Map<String, Value>,
    pub is_active: bool,
    #[ts(as = "Option<String>")]
    pub last_run: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub next_run: Option<DateTime<Utc>>,
    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ScheduledReport {
    /// Next execution strictly after `now` for this report's schedule.
    pub fn calculate_next_run(&self, now: DateTime<Utc>) -> CoreResult<DateTime<Utc>> {
        crate::schedule::calculate_next_run(&self.schedule, now)
    }

    /// Returns true when the report is active and its stored `next_run`
    /// has been reached.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.next_run.is_some_and(|next| next <= now)
    }
}

// =============================================================================
// Execution Status
// =============================================================================

/// Lifecycle state of a single report execution.
///
/// ```text
///  pending ──► running ──┬──► completed
///                        └──► failed
/// ```
/// Transitions are not guarded; any state may be re-entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl ExecutionStatus {
    /// Display label shown in execution history tables.
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "Pending",
            ExecutionStatus::Running => "Running",
            ExecutionStatus::Completed => "Completed",
            ExecutionStatus::Failed => "Failed",
        }
    }

    /// Completed and failed executions are finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }

    /// Stored/serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExecutionStatus::Pending),
            "running" => Ok(ExecutionStatus::Running),
            "completed" => Ok(ExecutionStatus::Completed),
            "failed" => Ok(ExecutionStatus::Failed),
            other => Err(CoreError::UnknownExecutionStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Report Execution
// =============================================================================

/// One firing of a scheduled report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportExecution {
    /// `exec_` followed by 32 random hex characters.
    pub id: String,
    pub report_id: String,
    pub status: ExecutionStatus,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    /// Set for every status except `running`.
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
    /// Where the rendered report landed.
    pub output_url: Option<String>,
    pub error_message: Option<String>,
    /// Free-form result details (row counts, file sizes, ...).
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub details: Map<String, Value>,
}

/// Fields merged over a [`ReportExecution`] on status change.
///
/// `None` leaves the previous value; `details` entries are merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionUpdate {
    #[serde(default)]
    pub output_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub details: Map<String, Value>,
}

impl ExecutionUpdate {
    pub fn with_output_url(mut self, url: impl Into<String>) -> Self {
        self.output_url = Some(url.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frequency_from_str() {
        assert_eq!(Frequency::from("weekly"), Frequency::Weekly);
        assert_eq!(
            Frequency::from("hourly"),
            Frequency::Unsupported("hourly".to_string())
        );
        assert!(!Frequency::from("hourly").is_supported());
        assert_eq!(String::from(Frequency::Quarterly), "quarterly");
    }

    #[test]
    fn test_schedule_config_wire_format() {
        let schedule = ScheduleConfig::weekly(0, "09:00", "America/New_York");
        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(
            value,
            json!({
                "frequency": "weekly",
                "time": "09:00",
                "timezone": "America/New_York",
                "dayOfWeek": 0
            })
        );
    }

    #[test]
    fn test_unknown_frequency_still_deserializes() {
        let schedule: ScheduleConfig = serde_json::from_value(json!({
            "frequency": "fortnightly",
            "time": "09:00",
            "timezone": "UTC"
        }))
        .unwrap();
        assert_eq!(
            schedule.frequency,
            Frequency::Unsupported("fortnightly".to_string())
        );
    }

    #[test]
    fn test_delivery_config_ftp_default_port() {
        let delivery: DeliveryConfig = serde_json::from_value(json!({
            "method": "ftp",
            "ftpConfig": { "host": "ftp.example.com", "username": "reports" }
        }))
        .unwrap();
        assert_eq!(delivery.method, DeliveryMethod::Ftp);
        assert_eq!(delivery.ftp_config.unwrap().port, 21);
    }

    #[test]
    fn test_execution_status_parse_and_label() {
        let status: ExecutionStatus = "completed".parse().unwrap();
        assert_eq!(status, ExecutionStatus::Completed);
        assert_eq!(status.label(), "Completed");
        assert!(status.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!("cancelled".parse::<ExecutionStatus>().is_err());
    }

    #[test]
    fn test_execution_status_defaults_to_pending() {
        assert_eq!(ExecutionStatus::default(), ExecutionStatus::Pending);
    }

    #[test]
    fn test_execution_update_builder() {
        let update = ExecutionUpdate::default()
            .with_output_url("https://x/y.pdf")
            .with_detail("rows", 42);
        assert_eq!(update.output_url.as_deref(), Some("https://x/y.pdf"));
        assert_eq!(update.details["rows"], json!(42));
    }
}
