//! Local wall-clock date arithmetic for the recurrence engine.
//!
//! The resolver works entirely in the caller's local time and never converts
//! between time zones, so everything here operates on naive dates and times.
//! Keeping the arithmetic in one place keeps the recurrence logic itself
//! independent of the underlying date library.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::ReminderTimeOfDay;

/// Weekday index with 0 = Sunday .. 6 = Saturday, the numbering used by
/// `RecurrenceRule::days_of_week`.
#[inline]
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whole days from `from` to `to`. Negative when `from` is later.
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
/// Negative when `from` is in a later month.
#[inline]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => {
            let next = add_months_clamped(first, 1);
            (next - first).num_days() as u32
        }
        None => 30,
    }
}

/// Advance a date by whole months, clamping the day of month to the end of
/// the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Build a date from a year, month and requested day of month, clamping the
/// day into the month's valid range rather than failing.
pub fn date_with_clamped_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let clamped = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped)
}

/// Map an occurrence date and a task's reminder time of day to the absolute
/// local instant the reminder fires (seconds and millis always zero).
#[inline]
pub fn occurrence_instant(date: NaiveDate, time: ReminderTimeOfDay) -> NaiveDateTime {
    let tod = NaiveTime::from_hms_opt(time.hour, time.minute, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(tod)
}
