use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

/// Calendar unit a recurrence interval is counted in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
}

impl std::fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceUnit::Day => write!(f, "day"),
            RecurrenceUnit::Week => write!(f, "week"),
            RecurrenceUnit::Month => write!(f, "month"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence unit: {0}")]
pub struct ParseRecurrenceUnitError(String);

impl FromStr for RecurrenceUnit {
    type Err = ParseRecurrenceUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(RecurrenceUnit::Day),
            "week" | "weekly" => Ok(RecurrenceUnit::Week),
            "month" | "monthly" => Ok(RecurrenceUnit::Month),
            _ => Err(ParseRecurrenceUnitError(s.to_string())),
        }
    }
}

/// Recurrence pattern for a task: "every N days/weeks/months", optionally
/// restricted to a set of weekdays or days of month.
///
/// Weekday values use 0 = Sunday .. 6 = Saturday; month days use 1..=31.
/// A `Week` rule with an empty weekday set (or a `Month` rule with an empty
/// month-day set) never matches: the resolver treats it as "no next
/// occurrence" rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Cycle length in `unit`s, counted from the task's anchor date.
    pub interval: u32,
    pub unit: RecurrenceUnit,
    /// For `Week` rules: which weekdays of an active cycle fire.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub days_of_week: BTreeSet<u8>,
    /// For `Month` rules: which days of month of an active cycle fire.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub days_of_month: BTreeSet<u8>,
}

impl RecurrenceRule {
    /// "Every `interval` days."
    pub fn daily(interval: u32) -> Self {
        Self {
            interval,
            unit: RecurrenceUnit::Day,
            days_of_week: BTreeSet::new(),
            days_of_month: BTreeSet::new(),
        }
    }

    /// "Every `interval` weeks, on the given weekdays (0 = Sunday)."
    pub fn weekly(interval: u32, days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            interval,
            unit: RecurrenceUnit::Week,
            days_of_week: days.into_iter().collect(),
            days_of_month: BTreeSet::new(),
        }
    }

    /// "Every `interval` months, on the given days of month (1..=31)."
    pub fn monthly(interval: u32, days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            interval,
            unit: RecurrenceUnit::Month,
            days_of_week: BTreeSet::new(),
            days_of_month: days.into_iter().collect(),
        }
    }

    /// Validates the rule at construction time. The resolver itself tolerates
    /// invalid shapes (collapsing them to "no occurrence"), but upstream task
    /// creation should reject them outright.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval < 1 {
            return Err(CoreError::InvalidRecurrence(
                "interval must be at least 1".to_string(),
            ));
        }
        match self.unit {
            RecurrenceUnit::Week => {
                if self.days_of_week.is_empty() {
                    return Err(CoreError::InvalidRecurrence(
                        "weekly rule requires at least one weekday".to_string(),
                    ));
                }
                if let Some(&day) = self.days_of_week.iter().find(|&&d| d > 6) {
                    return Err(CoreError::InvalidRecurrence(format!(
                        "weekday {} out of range 0..=6",
                        day
                    )));
                }
            }
            RecurrenceUnit::Month => {
                if self.days_of_month.is_empty() {
                    return Err(CoreError::InvalidRecurrence(
                        "monthly rule requires at least one day of month".to_string(),
                    ));
                }
                if let Some(&day) = self.days_of_month.iter().find(|&&d| d < 1 || d > 31) {
                    return Err(CoreError::InvalidRecurrence(format!(
                        "day of month {} out of range 1..=31",
                        day
                    )));
                }
            }
            RecurrenceUnit::Day => {}
        }
        Ok(())
    }
}

/// Wall-clock time of day a reminder fires, normalized to `:00.000`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderTimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl ReminderTimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        if hour > 23 {
            return Err(CoreError::InvalidReminderTime(format!(
                "hour {} out of range 0..=23",
                hour
            )));
        }
        if minute > 59 {
            return Err(CoreError::InvalidReminderTime(format!(
                "minute {} out of range 0..=59",
                minute
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl Default for ReminderTimeOfDay {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

/// Read model for a care task. Owned and persisted by the task CRUD layer;
/// this subsystem only reads it for the duration of one scheduling pass.
///
/// `created_at` doubles as the recurrence anchor: the origin instant interval
/// cycles are counted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub icon: Option<String>,
    pub reminder_time: ReminderTimeOfDay,
    pub recurrence: Option<RecurrenceRule>,
    pub created_at: NaiveDateTime,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: String::new(),
            icon: None,
            reminder_time: ReminderTimeOfDay::default(),
            recurrence: None,
            created_at: Local::now().naive_local(),
            completed: false,
            completed_at: None,
        }
    }
}

/// Read model for the user's reminder preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enable_reminder: bool,
    pub enable_overdue_reminder: bool,
    /// Minutes after the primary reminder that the overdue reminder fires.
    pub overdue_delay_minutes: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enable_reminder: true,
            enable_overdue_reminder: true,
            overdue_delay_minutes: 30,
        }
    }
}

/// Which of the two reminders a scheduled notification carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Reminder,
    Overdue,
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationCategory::Reminder => write!(f, "reminder"),
            NotificationCategory::Overdue => write!(f, "overdue"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid notification category: {0}")]
pub struct ParseNotificationCategoryError(String);

impl FromStr for NotificationCategory {
    type Err = ParseNotificationCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reminder" => Ok(NotificationCategory::Reminder),
            "overdue" => Ok(NotificationCategory::Overdue),
            _ => Err(ParseNotificationCategoryError(s.to_string())),
        }
    }
}

/// Payload handed to the platform notification gateway for one delayed
/// notification.
///
/// `correlation_id` follows `{category}_{task_id}_{unix_ts_of_trigger}` so
/// scheduled notifications can be deduped and debugged without keeping a
/// notification-id table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    pub correlation_id: String,
    pub task_id: Uuid,
}

/// Statistics collected during one scheduling pass.
#[derive(Debug, Clone, Default)]
pub struct SchedulePassSummary {
    /// Number of tasks examined.
    pub tasks_processed: usize,
    /// Total schedule requests issued (primary + overdue).
    pub requests_issued: usize,
    /// Requests the gateway accepted.
    pub scheduled: usize,
    /// Requests that failed; failures never abort the pass.
    pub failed: usize,
    /// Detailed error messages for failed requests.
    pub errors: Vec<String>,
    /// Time taken for the pass.
    pub duration_ms: u64,
}
