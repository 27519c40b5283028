//! Recurrence resolution: mapping a task's recurrence rule and the current
//! time to its next occurrence date, and enumerating a bounded window of
//! future occurrences.
//!
//! Everything here is pure: occurrences are always recomputed from
//! `(recurrence, created_at, now)` and never stored. Invalid rule shapes
//! (a weekly rule with no weekdays, say) collapse to "no occurrence" rather
//! than erroring; rejecting them outright is the task-creation layer's job.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::calendar::{
    add_months_clamped, date_with_clamped_day, days_between, months_between, occurrence_instant,
    weekday_index,
};
use crate::models::{RecurrenceRule, RecurrenceUnit, Task};

/// Computes the next occurrence date of `task` on or after `now`'s date.
///
/// - A task without a recurrence rule is a one-shot: it occurs on its anchor
///   day (`created_at`'s date) and never again once that day has passed.
/// - Interval rules count cycles from the anchor day. Within an active weekly
///   or monthly cycle the day set is searched forward from today; once
///   exhausted, the date advances to the first set day of the next cycle.
/// - A monthly set day that exceeds the target month's length is clamped to
///   the last day of that month rather than skipped.
///
/// Pure function: identical inputs always yield the identical result.
pub fn next_occurrence(task: &Task, now: NaiveDateTime) -> Option<NaiveDate> {
    let today = now.date();
    let anchor = task.created_at.date();

    let Some(rule) = &task.recurrence else {
        // One-shot: fires on the anchor day only.
        return (anchor >= today).then_some(anchor);
    };

    match rule.unit {
        RecurrenceUnit::Day => next_daily(rule.interval, anchor, today),
        RecurrenceUnit::Week => next_weekly(rule, anchor, today),
        RecurrenceUnit::Month => next_monthly(rule, anchor, today),
    }
}

fn next_daily(interval: u32, anchor: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let n = i64::from(interval.max(1));
    let since = days_between(anchor, today);
    if since < 0 {
        // Anchor in the future: the anchor day itself is the next occurrence.
        return Some(anchor);
    }
    let rem = since % n;
    if rem == 0 {
        Some(today)
    } else {
        Some(today + Duration::days(n - rem))
    }
}

fn next_weekly(rule: &RecurrenceRule, anchor: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let first_day = *rule.days_of_week.first()?;
    let n = i64::from(rule.interval.max(1));
    let today_wd = weekday_index(today);
    let weeks_since = days_between(anchor, today).div_euclid(7);
    let in_cycle = weeks_since.rem_euclid(n) == 0;

    if in_cycle {
        if rule.days_of_week.contains(&today_wd) {
            return Some(today);
        }
        // Later weekday in the current cycle week?
        if let Some(&day) = rule.days_of_week.iter().find(|&&d| d > today_wd) {
            return Some(today + Duration::days(i64::from(day - today_wd)));
        }
    }

    let weeks_to_add = if in_cycle {
        n
    } else {
        n - weeks_since.rem_euclid(n)
    };
    let day_offset = (i64::from(first_day) - i64::from(today_wd)).rem_euclid(7);
    Some(today + Duration::days(weeks_to_add * 7 + day_offset))
}

fn next_monthly(rule: &RecurrenceRule, anchor: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let first_day = *rule.days_of_month.first()?;
    let n = i64::from(rule.interval.max(1));
    let today_dom = today.day();
    let months_since = months_between(anchor, today);
    let in_cycle = months_since.rem_euclid(n) == 0;

    if in_cycle {
        if rule.days_of_month.contains(&(today_dom as u8)) {
            return Some(today);
        }
        // Later set day in the current cycle month, clamped to month end.
        if let Some(&day) = rule.days_of_month.iter().find(|&&d| u32::from(d) > today_dom) {
            return date_with_clamped_day(today.year(), today.month(), u32::from(day));
        }
    }

    let months_to_add = if in_cycle {
        n
    } else {
        n - months_since.rem_euclid(n)
    };
    let target = add_months_clamped(today.with_day(1)?, months_to_add as u32);
    date_with_clamped_day(target.year(), target.month(), u32::from(first_day))
}

/// Enumerates future occurrence dates of `task`, bounded by a look-ahead
/// horizon of `months_ahead` months and a result cap of `max_count`.
///
/// The walk seeds from [`next_occurrence`] and then advances the cursor by
/// one raw recurrence step per iteration (`+interval` days, weeks, or
/// clamped months). A date is included only when its reminder instant is
/// strictly after `now`, so today's occurrence drops out once its time of
/// day has passed. Results are strictly ascending.
pub fn future_occurrences(
    task: &Task,
    now: NaiveDateTime,
    months_ahead: u32,
    max_count: usize,
) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let Some(mut cursor) = next_occurrence(task, now) else {
        return out;
    };
    let horizon = add_months_clamped(now.date(), months_ahead);

    while cursor <= horizon && out.len() < max_count {
        if occurrence_instant(cursor, task.reminder_time) > now {
            out.push(cursor);
        }
        let Some(rule) = &task.recurrence else {
            break; // one-shot: nothing to step by
        };
        let step = rule.interval.max(1);
        cursor = match rule.unit {
            RecurrenceUnit::Day => cursor + Duration::days(i64::from(step)),
            RecurrenceUnit::Week => cursor + Duration::weeks(i64::from(step)),
            RecurrenceUnit::Month => add_months_clamped(cursor, step),
        };
    }

    out
}
