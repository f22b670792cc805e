//! # Schedule Descriptions
//!
//! Renders a schedule as the sentence shown in report lists and previews.
//!
//! ```text
//! daily      → "Daily at 9:00 AM America/New_York"
//! weekly     → "Every Monday at 9:00 AM America/New_York"
//! monthly    → "Monthly on the 15th at 9:00 AM America/New_York"
//! quarterly  → "Quarterly on the 1st at 9:00 AM America/New_York"
//! yearly     → "Yearly on March 15th at 9:00 AM America/New_York"
//! ```
//!
//! This runs in render paths, so it never fails: anything it cannot
//! describe becomes [`INVALID_SCHEDULE`].

use chrono::{NaiveTime, Timelike};

use crate::schedule::parse_time;
use crate::types::{Frequency, ScheduleConfig};

/// Rendered for schedules that cannot be described.
pub const INVALID_SCHEDULE: &str = "Invalid schedule";

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human-readable sentence for a schedule.
///
/// Missing day fields use the same defaults as the calculator (Sunday,
/// the 1st, January) so the sentence matches what will actually run.
///
/// ## Example
/// ```rust
/// use backroom_core::describe::schedule_description;
/// use backroom_core::types::ScheduleConfig;
///
/// let schedule = ScheduleConfig::monthly(15, "14:30", "Europe/London");
/// assert_eq!(
///     schedule_description(&schedule),
///     "Monthly on the 15th at 2:30 PM Europe/London"
/// );
/// ```
pub fn schedule_description(schedule: &ScheduleConfig) -> String {
    describe(schedule).unwrap_or_else(|| INVALID_SCHEDULE.to_string())
}

fn describe(schedule: &ScheduleConfig) -> Option<String> {
    let time = parse_time(&schedule.time).ok()?;
    let at = format!("at {} {}", format_time_12h(time), schedule.timezone);
    let day = schedule.day_of_month.unwrap_or(1);

    let sentence = match &schedule.frequency {
        Frequency::Daily => format!("Daily {at}"),
        Frequency::Weekly => {
            let weekday = WEEKDAYS.get(usize::from(schedule.day_of_week.unwrap_or(0)))?;
            format!("Every {weekday} {at}")
        }
        Frequency::Monthly => format!("Monthly on the {} {at}", ordinal(day)?),
        Frequency::Quarterly => format!("Quarterly on the {} {at}", ordinal(day)?),
        Frequency::Yearly => {
            let month = schedule.month_of_year.unwrap_or(1);
            let month = MONTHS.get(usize::from(month).checked_sub(1)?)?;
            format!("Yearly on {month} {} {at}", ordinal(day)?)
        }
        Frequency::Unsupported(_) => return None,
    };

    Some(sentence)
}

/// `09:05` → `"9:05 AM"`, `00:00` → `"12:00 AM"`, `12:30` → `"12:30 PM"`.
pub fn format_time_12h(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, time.minute(), suffix)
}

/// Day of month with its English suffix (`1st`, `2nd`, `11th`, `23rd`).
///
/// Returns `None` outside 1..=31.
pub fn ordinal(day: u8) -> Option<String> {
    if !(1..=31).contains(&day) {
        return None;
    }

    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };

    Some(format!("{day}{suffix}"))
}

// =============================================================================
// Unit Tests
// =============================================================================
