//! # Validation Module
//!
//! Completeness checks for scheduled report configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Schedule form (frontend)                                     │
//! │  └── Immediate feedback while editing                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_scheduled_report → Vec<String>   (never fails)           │
//! │  └── validate_report_name      → Result        (save-time check)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: backroom-db                                                  │
//! │  └── Refuses to store a report with any finding                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Findings vs Errors
//! Every rule runs; every violated rule is reported. An empty list means
//! the report is valid. Whether to block a save is the caller's decision.

use thiserror::Error;
use url::Url;

use crate::error::ValidationError;
use crate::schedule::{parse_time, parse_timezone};
use crate::types::{DeliveryMethod, Frequency, ScheduledReport};
use crate::MAX_REPORT_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Schedule Issues
// =============================================================================

/// One problem found in a scheduled report's configuration.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleIssue {
    #[error("Day of week is required for weekly schedules")]
    MissingDayOfWeek,

    #[error("Day of month is required for monthly and quarterly schedules")]
    MissingDayOfMonth,

    #[error("Month and day are required for yearly schedules")]
    MissingYearlyDate,

    #[error("At least one email recipient is required")]
    MissingRecipients,

    #[error("Webhook URL is required")]
    MissingWebhookUrl,

    #[error("FTP configuration is required")]
    MissingFtpConfig,

    #[error("Time must be in HH:MM format")]
    InvalidTime,

    #[error("Timezone '{0}' is not recognized")]
    UnknownTimezone(String),

    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    #[error("Day of week must be between 0 and 6")]
    DayOfWeekOutOfRange,

    #[error("Day of month must be between 1 and 31")]
    DayOfMonthOutOfRange,

    #[error("Month must be between 1 and 12")]
    MonthOutOfRange,

    #[error("Webhook URL must be a valid http(s) URL")]
    InvalidWebhookUrl,

    #[error("Email recipients must not be blank")]
    BlankRecipient,
}

/// Collects every configuration issue of a scheduled report.
///
/// Required-field rules come first, in the order the schedule form shows
/// them, followed by structural checks on the values that are present.
///
/// A webhook URL made only of whitespace is reported as missing rather
/// than as a malformed URL.
pub fn schedule_issues(report: &ScheduledReport) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();
    let schedule = &report.schedule;
    let delivery = &report.delivery;

    // --- Required fields per frequency --------------------------------------
    match schedule.frequency {
        Frequency::Weekly if schedule.day_of_week.is_none() => {
            issues.push(ScheduleIssue::MissingDayOfWeek);
        }
        Frequency::Monthly | Frequency::Quarterly if schedule.day_of_month.is_none() => {
            issues.push(ScheduleIssue::MissingDayOfMonth);
        }
        Frequency::Yearly
            if schedule.month_of_year.is_none() || schedule.day_of_month.is_none() =>
        {
            issues.push(ScheduleIssue::MissingYearlyDate);
        }
        _ => {}
    }

    // --- Required fields per delivery method --------------------------------
    let webhook_url = delivery
        .webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    match delivery.method {
        DeliveryMethod::Email => {
            if delivery.recipients.as_ref().map_or(true, Vec::is_empty) {
                issues.push(ScheduleIssue::MissingRecipients);
            }
        }
        DeliveryMethod::Webhook => {
            if webhook_url.is_none() {
                issues.push(ScheduleIssue::MissingWebhookUrl);
            }
        }
        DeliveryMethod::Ftp => {
            if delivery.ftp_config.is_none() {
                issues.push(ScheduleIssue::MissingFtpConfig);
            }
        }
    }

    // --- Structural checks --------------------------------------------------
    if parse_time(&schedule.time).is_err() {
        issues.push(ScheduleIssue::InvalidTime);
    }

    if parse_timezone(&schedule.timezone).is_err() {
        issues.push(ScheduleIssue::UnknownTimezone(schedule.timezone.clone()));
    }

    if let Frequency::Unsupported(other) = &schedule.frequency {
        issues.push(ScheduleIssue::UnsupportedFrequency(other.clone()));
    }

    if schedule.day_of_week.is_some_and(|dow| dow > 6) {
        issues.push(ScheduleIssue::DayOfWeekOutOfRange);
    }

    if schedule.day_of_month.is_some_and(|dom| !(1..=31).contains(&dom)) {
        issues.push(ScheduleIssue::DayOfMonthOutOfRange);
    }

    if schedule.month_of_year.is_some_and(|month| !(1..=12).contains(&month)) {
        issues.push(ScheduleIssue::MonthOutOfRange);
    }

    if delivery.method == DeliveryMethod::Webhook {
        if let Some(url) = webhook_url {
            if !is_http_url(url) {
                issues.push(ScheduleIssue::InvalidWebhookUrl);
            }
        }
    }

    if delivery.method == DeliveryMethod::Email {
        let has_blank = delivery
            .recipients
            .iter()
            .flatten()
            .any(|recipient| recipient.trim().is_empty());
        if has_blank {
            issues.push(ScheduleIssue::BlankRecipient);
        }
    }

    issues
}

/// Validates a scheduled report, returning one message per problem.
///
/// ## Example
/// ```rust
/// # use chrono::Utc;
/// use backroom_core::types::{DeliveryConfig, ScheduleConfig, ScheduledReport};
/// use backroom_core::validation::validate_scheduled_report;
///
/// let mut schedule = ScheduleConfig::weekly(1, "09:00", "UTC");
/// schedule.day_of_week = None;
/// # let now = Utc::now();
/// let report = ScheduledReport {
///     id: "r1".into(),
///     tenant_id: backroom_core::DEFAULT_TENANT_ID.into(),
///     name: "Weekly stock".into(),
///     report_type: "inventory".into(),
///     schedule,
///     delivery: DeliveryConfig::email(Vec::<String>::new()),
///     parameters: Default::default(),
///     is_active: true,
///     last_run: None,
///     next_run: None,
///     created_by: "admin".into(),
///     created_at: now,
///     updated_at: now,
/// };
///
/// assert_eq!(
///     validate_scheduled_report(&report),
///     vec![
///         "Day of week is required for weekly schedules".to_string(),
///         "At least one email recipient is required".to_string(),
///     ]
/// );
/// ```
pub fn validate_scheduled_report(report: &ScheduledReport) -> Vec<String> {
    schedule_issues(report)
        .into_iter()
        .map(|issue| issue.to_string())
        .collect()
}

/// Turns findings into an error for callers that block saves on them.
pub fn ensure_valid(report: &ScheduledReport) -> ValidationResult<()> {
    let issues = validate_scheduled_report(report);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidReport { issues })
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a report display name.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_REPORT_NAME_LEN`] characters
pub fn validate_report_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_REPORT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_REPORT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a report type key ("sales_summary", "low_stock", ...).
pub fn validate_report_type(report_type: &str) -> ValidationResult<()> {
    if report_type.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "report_type".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryConfig, FtpConfig, ScheduleConfig};
    use chrono::{TimeZone, Utc};

    fn report(schedule: ScheduleConfig, delivery: DeliveryConfig) -> ScheduledReport {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ScheduledReport {
            id: "report_1".to_string(),
            tenant_id: crate::DEFAULT_TENANT_ID.to_string(),
            name: "Sales".to_string(),
            report_type: "sales_summary".to_string(),
            schedule,
            delivery,
            parameters: Default::default(),
            is_active: true,
            last_run: None,
            next_run: None,
            created_by: "admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn email() -> DeliveryConfig {
        DeliveryConfig::email(["owner@example.com"])
    }

    #[test]
    fn test_valid_report_has_no_issues() {
        let r = report(ScheduleConfig::weekly(0, "09:00", "America/New_York"), email());
        assert!(validate_scheduled_report(&r).is_empty());
        assert!(ensure_valid(&r).is_ok());
    }

    #[test]
    fn test_weekly_requires_day_of_week() {
        let mut schedule = ScheduleConfig::weekly(0, "09:00", "UTC");
        schedule.day_of_week = None;
        let issues = validate_scheduled_report(&report(schedule, email()));
        assert!(issues.contains(&"Day of week is required for weekly schedules".to_string()));
    }

    #[test]
    fn test_sunday_is_a_valid_day_of_week() {
        let r = report(ScheduleConfig::weekly(0, "09:00", "UTC"), email());
        assert!(!schedule_issues(&r).contains(&ScheduleIssue::MissingDayOfWeek));
    }

    #[test]
    fn test_monthly_and_quarterly_require_day_of_month() {
        for mut schedule in [
            ScheduleConfig::monthly(1, "09:00", "UTC"),
            ScheduleConfig::quarterly(1, "09:00", "UTC"),
        ] {
            schedule.day_of_month = None;
            assert_eq!(
                schedule_issues(&report(schedule, email())),
                vec![ScheduleIssue::MissingDayOfMonth]
            );
        }
    }

    #[test]
    fn test_yearly_requires_month_and_day() {
        let mut schedule = ScheduleConfig::yearly(3, 15, "09:00", "UTC");
        schedule.month_of_year = None;
        assert_eq!(
            schedule_issues(&report(schedule, email())),
            vec![ScheduleIssue::MissingYearlyDate]
        );
    }

    #[test]
    fn test_email_requires_recipients() {
        let r = report(
            ScheduleConfig::daily("09:00", "UTC"),
            DeliveryConfig::email(Vec::<String>::new()),
        );
        assert_eq!(
            validate_scheduled_report(&r),
            vec!["At least one email recipient is required".to_string()]
        );

        let mut delivery = email();
        delivery.recipients = None;
        let r = report(ScheduleConfig::daily("09:00", "UTC"), delivery);
        assert_eq!(schedule_issues(&r), vec![ScheduleIssue::MissingRecipients]);
    }

    #[test]
    fn test_webhook_requires_url() {
        let r = report(ScheduleConfig::daily("09:00", "UTC"), DeliveryConfig::webhook(""));
        assert_eq!(schedule_issues(&r), vec![ScheduleIssue::MissingWebhookUrl]);

        // Whitespace-only is treated as missing, not as a malformed URL.
        let r = report(ScheduleConfig::daily("09:00", "UTC"), DeliveryConfig::webhook("  "));
        assert_eq!(schedule_issues(&r), vec![ScheduleIssue::MissingWebhookUrl]);

        let r = report(
            ScheduleConfig::daily("09:00", "UTC"),
            DeliveryConfig::webhook("ftp://files.example.com"),
        );
        assert_eq!(schedule_issues(&r), vec![ScheduleIssue::InvalidWebhookUrl]);

        let r = report(
            ScheduleConfig::daily("09:00", "UTC"),
            DeliveryConfig::webhook("https://hooks.example.com/reports"),
        );
        assert!(schedule_issues(&r).is_empty());
    }

    #[test]
    fn test_ftp_requires_config() {
        let mut delivery = DeliveryConfig::ftp(FtpConfig {
            host: "ftp.example.com".to_string(),
            port: 21,
            username: "reports".to_string(),
            password: None,
            directory: None,
        });
        let r = report(ScheduleConfig::daily("09:00", "UTC"), delivery.clone());
        assert!(schedule_issues(&r).is_empty());

        delivery.ftp_config = None;
        let r = report(ScheduleConfig::daily("09:00", "UTC"), delivery);
        assert_eq!(
            validate_scheduled_report(&r),
            vec!["FTP configuration is required".to_string()]
        );
    }

    #[test]
    fn test_all_violations_reported() {
        let mut schedule = ScheduleConfig::yearly(14, 40, "25:00", "Moon/Base");
        schedule.day_of_month = None;
        let r = report(schedule, DeliveryConfig::email([" "]));
        assert_eq!(
            schedule_issues(&r),
            vec![
                ScheduleIssue::MissingYearlyDate,
                ScheduleIssue::InvalidTime,
                ScheduleIssue::UnknownTimezone("Moon/Base".to_string()),
                ScheduleIssue::MonthOutOfRange,
                ScheduleIssue::BlankRecipient,
            ]
        );
    }

    #[test]
    fn test_unsupported_frequency_is_reported() {
        let mut schedule = ScheduleConfig::daily("09:00", "UTC");
        schedule.frequency = Frequency::from("hourly");
        let issues = validate_scheduled_report(&report(schedule, email()));
        assert_eq!(issues, vec!["Unsupported frequency: hourly".to_string()]);
    }

    #[test]
    fn test_ensure_valid_wraps_messages() {
        let r = report(ScheduleConfig::daily("09:00", "UTC"), DeliveryConfig::webhook(""));
        let err = ensure_valid(&r).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidReport {
                issues: vec!["Webhook URL is required".to_string()]
            }
        );
    }

    #[test]
    fn test_validate_report_name() {
        assert!(validate_report_name("Daily sales summary").is_ok());
        assert!(validate_report_name("   ").is_err());
        assert!(validate_report_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_report_type() {
        assert!(validate_report_type("inventory").is_ok());
        assert!(validate_report_type("").is_err());
    }
}
