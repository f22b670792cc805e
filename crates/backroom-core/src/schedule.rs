//! # Schedule Module
//!
//! Computes when a recurring report fires next.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    calculate_next_run(schedule, now)                    │
//! │                                                                         │
//! │  now (UTC) ──► local date in schedule.timezone                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base = today @ HH:MM     (not after now? → base = tomorrow)           │
//! │       │                                                                 │
//! │       ├── daily      → base                                            │
//! │       ├── weekly     → base + (dow - base.dow + 7) % 7 days            │
//! │       ├── monthly    → base.month / day_of_month   (+1 month steps)    │
//! │       ├── quarterly  → quarter start / day_of_month (+3 month steps)   │
//! │       └── yearly     → month_of_year / day_of_month (+1 year steps)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  local wall time ──► UTC instant   (strictly after now)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wall-Clock Resolution
//! - Ambiguous local times (DST fall-back) resolve to the earlier instant.
//! - Local times inside a DST gap move forward by the gap.
//! - A day of month missing from a period (31 April, 29 February in a
//!   common year) is never rolled into the next month; the search moves
//!   on to the next period that has that day.
//!
//! Every "is it after now?" check compares resolved UTC instants, so the
//! result is always strictly after `now`.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};
use crate::types::{Frequency, ScheduleConfig, ScheduledReport};

/// Number of runs returned by [`upcoming_schedule`] previews by default.
pub const DEFAULT_UPCOMING_COUNT: usize = 5;

/// Upper bound on period steps when looking for a month/year that has the
/// requested day. Yearly 29 February needs at most 8 (century gaps).
const MAX_PERIOD_STEPS: u32 = 16;

/// Largest DST gap worth stepping over, in one-hour increments.
const MAX_GAP_HOURS: u32 = 3;

// =============================================================================
// Parsing Helpers
// =============================================================================

/// Parses a schedule time of day.
///
/// ## Rules
/// - `"HH:MM"` or `"H:MM"`, digits only
/// - Hour 0..=23, minute 0..=59
///
/// ## Example
/// ```rust
/// use backroom_core::schedule::parse_time;
///
/// assert!(parse_time("09:30").is_ok());
/// assert!(parse_time("7:05").is_ok());
/// assert!(parse_time("24:00").is_err());
/// assert!(parse_time("9am").is_err());
/// ```
pub fn parse_time(time: &str) -> CoreResult<NaiveTime> {
    let invalid = || CoreError::InvalidTime(time.to_string());

    let (hour, minute) = time.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Parses an IANA timezone name ("America/New_York", "UTC", ...).
pub fn parse_timezone(timezone: &str) -> CoreResult<Tz> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Rejects stored day/month values the calculator cannot place.
///
/// Missing values are fine here: they take the tolerant defaults
/// (Sunday, the 1st, January).
fn check_field_ranges(schedule: &ScheduleConfig) -> CoreResult<()> {
    if let Some(dow) = schedule.day_of_week {
        if dow > 6 {
            return Err(CoreError::InvalidScheduleField {
                field: "dayOfWeek",
                value: dow,
            });
        }
    }

    if let Some(dom) = schedule.day_of_month {
        if !(1..=31).contains(&dom) {
            return Err(CoreError::InvalidScheduleField {
                field: "dayOfMonth",
                value: dom,
            });
        }
    }

    if let Some(month) = schedule.month_of_year {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidScheduleField {
                field: "monthOfYear",
                value: month,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Wall-Clock Resolution
// =============================================================================

/// Converts a local wall time in `tz` into an absolute UTC instant.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> CoreResult<DateTime<Utc>> {
    let mut wall = local;

    for _ in 0..=MAX_GAP_HOURS {
        match tz.from_local_datetime(&wall) {
            LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest.with_timezone(&Utc)),
            // Spring-forward gap: this wall time never happens.
            LocalResult::None => wall += Duration::hours(1),
        }
    }

    Err(CoreError::ScheduleOverflow {
        frequency: format!("local time {local}"),
    })
}

/// Walks forward from `anchor` (a first-of-month date) in steps of
/// `step_months`, returning the first period whose `day` exists and whose
/// resolved instant is after `now`.
fn first_occurrence_after(
    tz: &Tz,
    time: NaiveTime,
    now: DateTime<Utc>,
    anchor: NaiveDate,
    step_months: u32,
    day: u32,
    frequency: &Frequency,
) -> CoreResult<DateTime<Utc>> {
    for step in 0..MAX_PERIOD_STEPS {
        let Some(period_start) = anchor.checked_add_months(Months::new(step * step_months)) else {
            break;
        };

        // Day missing from this period: skip it rather than overflow.
        let Some(date) = period_start.with_day(day) else {
            continue;
        };

        let instant = resolve_local(tz, date.and_time(time))?;
        if instant > now {
            return Ok(instant);
        }
    }

    Err(CoreError::ScheduleOverflow {
        frequency: frequency.to_string(),
    })
}

fn overflow(frequency: &Frequency) -> CoreError {
    CoreError::ScheduleOverflow {
        frequency: frequency.to_string(),
    }
}

// =============================================================================
// Next Run
// =============================================================================

/// Calculates the next execution time of a schedule, strictly after `now`.
///
/// ## Defaults
/// Missing `day_of_week` → Sunday, `day_of_month` → 1, `month_of_year` →
/// January. Validation flags these as missing; calculation tolerates them.
///
/// ## Errors
/// - [`CoreError::UnsupportedFrequency`] for an unknown cadence
/// - [`CoreError::InvalidTime`] / [`CoreError::InvalidTimezone`] for
///   unparseable `time` / `timezone`
/// - [`CoreError::InvalidScheduleField`] for out-of-range day/month values
///
/// ## Example
/// ```rust
/// use chrono::{Datelike, TimeZone, Utc, Weekday};
/// use backroom_core::schedule::calculate_next_run;
/// use backroom_core::types::ScheduleConfig;
///
/// // Every Monday at 08:00 UTC, asked on Wednesday 2024-05-15.
/// let schedule = ScheduleConfig::weekly(1, "08:00", "UTC");
/// let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
///
/// let next = calculate_next_run(&schedule, now).unwrap();
/// assert_eq!(next.weekday(), Weekday::Mon);
/// assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap());
/// ```
pub fn calculate_next_run(schedule: &ScheduleConfig, now: DateTime<Utc>) -> CoreResult<DateTime<Utc>> {
    if let Frequency::Unsupported(other) = &schedule.frequency {
        return Err(CoreError::UnsupportedFrequency(other.clone()));
    }

    check_field_ranges(schedule)?;
    let tz = parse_timezone(&schedule.timezone)?;
    let time = parse_time(&schedule.time)?;

    // Base day: today in the report's zone, or tomorrow if today's slot passed.
    let today = now.with_timezone(&tz).date_naive();
    let base = if resolve_local(&tz, today.and_time(time))? > now {
        today
    } else {
        today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| overflow(&schedule.frequency))?
    };

    let day_of_month = u32::from(schedule.day_of_month.unwrap_or(1));

    match &schedule.frequency {
        Frequency::Daily => resolve_local(&tz, base.and_time(time)),

        Frequency::Weekly => {
            let target = u32::from(schedule.day_of_week.unwrap_or(0));
            let current = base.weekday().num_days_from_sunday();
            let ahead = (target + 7 - current) % 7;

            let date = base
                .checked_add_days(Days::new(u64::from(ahead)))
                .ok_or_else(|| overflow(&schedule.frequency))?;
            resolve_local(&tz, date.and_time(time))
        }

        Frequency::Monthly => {
            let anchor = first_of_month(base.year(), base.month(), &schedule.frequency)?;
            first_occurrence_after(&tz, time, now, anchor, 1, day_of_month, &schedule.frequency)
        }

        Frequency::Quarterly => {
            let quarter_start = (base.month0() / 3) * 3 + 1;
            let anchor = first_of_month(base.year(), quarter_start, &schedule.frequency)?;
            first_occurrence_after(&tz, time, now, anchor, 3, day_of_month, &schedule.frequency)
        }

        Frequency::Yearly => {
            let month = u32::from(schedule.month_of_year.unwrap_or(1));
            let anchor = first_of_month(base.year(), month, &schedule.frequency)?;
            first_occurrence_after(&tz, time, now, anchor, 12, day_of_month, &schedule.frequency)
        }

        Frequency::Unsupported(other) => Err(CoreError::UnsupportedFrequency(other.clone())),
    }
}

fn first_of_month(year: i32, month: u32, frequency: &Frequency) -> CoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| overflow(frequency))
}

// =============================================================================
// Upcoming Runs
// =============================================================================

/// Lists the next `count` run times of a report, in increasing order.
///
/// ## Seeding
/// ```text
/// report.next_run = Some(t0)  →  [t0, next(t0), next(next(t0)), ...]
/// report.next_run = None      →  [next(now), next(next(now)), ...]
/// ```
/// The stored `next_run` is taken as-is. If it is stale (in the past) the
/// first entries of the preview are in the past too; callers that need a
/// fresh preview should store a fresh `next_run` first.
pub fn upcoming_schedule(
    report: &ScheduledReport,
    count: usize,
    now: DateTime<Utc>,
) -> CoreResult<Vec<DateTime<Utc>>> {
    let mut runs = Vec::with_capacity(count);
    if count == 0 {
        return Ok(runs);
    }

    let mut current = match report.next_run {
        Some(stored) => stored,
        None => calculate_next_run(&report.schedule, now)?,
    };
    runs.push(current);

    while runs.len() < count {
        current = calculate_next_run(&report.schedule, current)?;
        runs.push(current);
    }

    Ok(runs)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:00").unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(parse_time("7:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(parse_time("23:59").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());

        assert!(parse_time("").is_err());
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("12:5").is_err());
        assert!(parse_time("+1:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/New_York").unwrap(), Tz::America__New_York);
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_daily_later_today() {
        let schedule = ScheduleConfig::daily("09:00", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 6, 1, 8, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 1, 9, 0));
    }

    #[test]
    fn test_daily_same_instant_rolls_forward() {
        let schedule = ScheduleConfig::daily("09:00", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 6, 1, 9, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 2, 9, 0));
    }

    #[test]
    fn test_daily_converts_timezone() {
        // 09:00 in New York during EDT (UTC-4) is 13:00 UTC.
        let schedule = ScheduleConfig::daily("09:00", "America/New_York");
        let next = calculate_next_run(&schedule, utc(2024, 7, 10, 14, 0)).unwrap();
        assert_eq!(next, utc(2024, 7, 11, 13, 0));
    }

    #[test]
    fn test_daily_uses_local_date_not_utc_date() {
        // 02:00 UTC on the 11th is still the 10th (22:00) in New York.
        let schedule = ScheduleConfig::daily("23:00", "America/New_York");
        let next = calculate_next_run(&schedule, utc(2024, 7, 11, 2, 0)).unwrap();
        assert_eq!(next, utc(2024, 7, 11, 3, 0));
    }

    #[test]
    fn test_weekly_lands_on_requested_day() {
        let now = utc(2024, 5, 15, 10, 0); // Wednesday
        for dow in 0..=6u8 {
            let schedule = ScheduleConfig::weekly(dow, "08:00", "UTC");
            let next = calculate_next_run(&schedule, now).unwrap();
            assert!(next > now);
            assert_eq!(next.weekday().num_days_from_sunday(), u32::from(dow));
            assert!(next - now <= Duration::days(7));
        }
    }

    #[test]
    fn test_weekly_same_day_passed_goes_to_next_week() {
        // Wednesday 10:00, schedule Wednesday 08:00 → next Wednesday.
        let schedule = ScheduleConfig::weekly(3, "08:00", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 5, 15, 10, 0)).unwrap();
        assert_eq!(next, utc(2024, 5, 22, 8, 0));
    }

    #[test]
    fn test_weekly_missing_day_defaults_to_sunday() {
        let mut schedule = ScheduleConfig::weekly(1, "08:00", "UTC");
        schedule.day_of_week = None;
        let next = calculate_next_run(&schedule, utc(2024, 5, 15, 10, 0)).unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
        assert_eq!(next, utc(2024, 5, 19, 8, 0));
    }

    #[test]
    fn test_monthly_this_month_and_next() {
        let schedule = ScheduleConfig::monthly(15, "09:00", "UTC");
        assert_eq!(
            calculate_next_run(&schedule, utc(2024, 3, 10, 0, 0)).unwrap(),
            utc(2024, 3, 15, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&schedule, utc(2024, 3, 20, 0, 0)).unwrap(),
            utc(2024, 4, 15, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&schedule, utc(2024, 3, 15, 9, 0)).unwrap(),
            utc(2024, 4, 15, 9, 0)
        );
    }

    #[test]
    fn test_monthly_day_31_skips_short_months() {
        let schedule = ScheduleConfig::monthly(31, "09:00", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 4, 2, 0, 0)).unwrap();
        assert_eq!(next, utc(2024, 5, 31, 9, 0));
    }

    #[test]
    fn test_monthly_year_rollover() {
        let schedule = ScheduleConfig::monthly(1, "00:30", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 12, 15, 0, 0)).unwrap();
        assert_eq!(next, utc(2025, 1, 1, 0, 30));
    }

    #[test]
    fn test_monthly_day_always_matches() {
        let mut now = utc(2024, 1, 1, 0, 0);
        let schedule = ScheduleConfig::monthly(30, "06:15", "Europe/Berlin");
        let tz = parse_timezone("Europe/Berlin").unwrap();
        for _ in 0..24 {
            let next = calculate_next_run(&schedule, now).unwrap();
            assert!(next > now);
            assert_eq!(next.with_timezone(&tz).day(), 30);
            now = next;
        }
    }

    #[test]
    fn test_quarterly_snaps_to_quarter_start() {
        let schedule = ScheduleConfig::quarterly(10, "09:00", "UTC");
        // Early May: quarter started in April, the 10th of April is past.
        let next = calculate_next_run(&schedule, utc(2024, 5, 5, 0, 0)).unwrap();
        assert_eq!(next, utc(2024, 7, 10, 9, 0));

        // Early April: the 10th is still ahead.
        let next = calculate_next_run(&schedule, utc(2024, 4, 2, 0, 0)).unwrap();
        assert_eq!(next, utc(2024, 4, 10, 9, 0));

        // Mid November rolls over into the next year.
        let next = calculate_next_run(&schedule, utc(2024, 11, 15, 0, 0)).unwrap();
        assert_eq!(next, utc(2025, 1, 10, 9, 0));
    }

    #[test]
    fn test_quarterly_months_are_quarter_starts() {
        let schedule = ScheduleConfig::quarterly(1, "12:00", "Asia/Tokyo");
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let mut now = utc(2023, 2, 14, 5, 0);
        for _ in 0..8 {
            let next = calculate_next_run(&schedule, now).unwrap();
            assert!(next > now);
            assert!([0, 3, 6, 9].contains(&next.with_timezone(&tz).month0()));
            now = next;
        }
    }

    #[test]
    fn test_yearly() {
        let schedule = ScheduleConfig::yearly(3, 15, "09:00", "UTC");
        assert_eq!(
            calculate_next_run(&schedule, utc(2024, 1, 1, 0, 0)).unwrap(),
            utc(2024, 3, 15, 9, 0)
        );
        assert_eq!(
            calculate_next_run(&schedule, utc(2024, 3, 16, 0, 0)).unwrap(),
            utc(2025, 3, 15, 9, 0)
        );
    }

    #[test]
    fn test_yearly_defaults_to_january_first() {
        let mut schedule = ScheduleConfig::yearly(6, 1, "09:00", "UTC");
        schedule.month_of_year = None;
        schedule.day_of_month = None;
        let next = calculate_next_run(&schedule, utc(2024, 2, 1, 0, 0)).unwrap();
        assert_eq!(next, utc(2025, 1, 1, 9, 0));
    }

    #[test]
    fn test_yearly_leap_day_waits_for_leap_year() {
        let schedule = ScheduleConfig::yearly(2, 29, "09:00", "UTC");
        let next = calculate_next_run(&schedule, utc(2024, 3, 1, 0, 0)).unwrap();
        assert_eq!(next, utc(2028, 2, 29, 9, 0));
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        // 2024-03-10 02:30 does not exist in New York; it becomes 03:30 EDT.
        let schedule = ScheduleConfig::daily("02:30", "America/New_York");
        let next = calculate_next_run(&schedule, utc(2024, 3, 10, 5, 0)).unwrap();
        assert_eq!(next, utc(2024, 3, 10, 7, 30));
        assert_eq!(next.with_timezone(&Tz::America__New_York).hour(), 3);
    }

    #[test]
    fn test_dst_fold_takes_earliest() {
        // 2024-11-03 01:30 happens twice in New York; take the EDT one.
        let schedule = ScheduleConfig::daily("01:30", "America/New_York");
        let next = calculate_next_run(&schedule, utc(2024, 11, 3, 4, 0)).unwrap();
        assert_eq!(next, utc(2024, 11, 3, 5, 30));
    }

    #[test]
    fn test_unsupported_frequency_fails() {
        let mut schedule = ScheduleConfig::daily("09:00", "UTC");
        schedule.frequency = Frequency::from("hourly");
        let err = calculate_next_run(&schedule, utc(2024, 1, 1, 0, 0)).unwrap_err();
        assert_eq!(err, CoreError::UnsupportedFrequency("hourly".to_string()));
    }

    #[test]
    fn test_invalid_inputs_fail() {
        let now = utc(2024, 1, 1, 0, 0);

        let schedule = ScheduleConfig::daily("9 o'clock", "UTC");
        assert!(matches!(calculate_next_run(&schedule, now), Err(CoreError::InvalidTime(_))));

        let schedule = ScheduleConfig::daily("09:00", "Nowhere/Special");
        assert!(matches!(
            calculate_next_run(&schedule, now),
            Err(CoreError::InvalidTimezone(_))
        ));

        let schedule = ScheduleConfig::monthly(32, "09:00", "UTC");
        assert!(matches!(
            calculate_next_run(&schedule, now),
            Err(CoreError::InvalidScheduleField { field: "dayOfMonth", .. })
        ));

        let schedule = ScheduleConfig::weekly(7, "09:00", "UTC");
        assert!(matches!(
            calculate_next_run(&schedule, now),
            Err(CoreError::InvalidScheduleField { field: "dayOfWeek", .. })
        ));
    }

    #[test]
    fn test_always_strictly_after_now() {
        let schedules = [
            ScheduleConfig::daily("00:00", "Pacific/Auckland"),
            ScheduleConfig::weekly(5, "23:59", "America/Los_Angeles"),
            ScheduleConfig::monthly(28, "12:00", "Europe/London"),
            ScheduleConfig::quarterly(31, "06:00", "Australia/Sydney"),
            ScheduleConfig::yearly(12, 31, "18:00", "Asia/Kolkata"),
        ];
        let mut now = utc(2023, 12, 31, 11, 0);
        for _ in 0..40 {
            for schedule in &schedules {
                let next = calculate_next_run(schedule, now).unwrap();
                assert!(next > now, "{:?} at {} gave {}", schedule.frequency, now, next);
            }
            now += Duration::hours(217);
        }
    }

    fn report_with(schedule: ScheduleConfig, next_run: Option<DateTime<Utc>>) -> ScheduledReport {
        let created = utc(2024, 1, 1, 0, 0);
        ScheduledReport {
            id: "report_1".to_string(),
            tenant_id: crate::DEFAULT_TENANT_ID.to_string(),
            name: "Daily sales".to_string(),
            report_type: "sales_summary".to_string(),
            schedule,
            delivery: crate::types::DeliveryConfig::email(["owner@example.com"]),
            parameters: Default::default(),
            is_active: true,
            last_run: None,
            next_run,
            created_by: "admin".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_upcoming_schedule_strictly_increasing() {
        let report = report_with(ScheduleConfig::daily("09:00", "UTC"), Some(utc(2024, 6, 1, 9, 0)));
        let runs = upcoming_schedule(&report, 3, utc(2024, 5, 31, 12, 0)).unwrap();
        assert_eq!(
            runs,
            vec![utc(2024, 6, 1, 9, 0), utc(2024, 6, 2, 9, 0), utc(2024, 6, 3, 9, 0)]
        );
    }

    #[test]
    fn test_upcoming_schedule_keeps_stale_next_run() {
        let stale = utc(2024, 1, 1, 9, 0);
        let report = report_with(ScheduleConfig::weekly(1, "09:00", "UTC"), Some(stale));
        let runs = upcoming_schedule(&report, DEFAULT_UPCOMING_COUNT, utc(2024, 6, 1, 0, 0)).unwrap();
        assert_eq!(runs.len(), DEFAULT_UPCOMING_COUNT);
        assert_eq!(runs[0], stale);
        assert!(runs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_upcoming_schedule_without_next_run_starts_from_now() {
        let report = report_with(ScheduleConfig::monthly(1, "09:00", "UTC"), None);
        let now = utc(2024, 6, 10, 0, 0);
        let runs = upcoming_schedule(&report, 2, now).unwrap();
        assert_eq!(runs, vec![utc(2024, 7, 1, 9, 0), utc(2024, 8, 1, 9, 0)]);
        assert!(upcoming_schedule(&report, 0, now).unwrap().is_empty());
    }
}
