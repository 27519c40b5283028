//! # Tend Core Library
//!
//! Recurrence resolution and reminder scheduling engine for the Tend
//! care-coordination app.
//!
//! ## Features
//!
//! - **Interval Recurrence**: "every N days/weeks/months" rules with
//!   weekday and day-of-month sets, counted from a task's anchor date
//! - **Short-Month Clamping**: day-of-month occurrences clamp to the end of
//!   short months instead of being skipped
//! - **Bounded Enumeration**: finite, strictly ascending windows of future
//!   occurrences, recomputed on demand and never persisted
//! - **Full-Reset Scheduling**: cancel-then-reschedule passes against a
//!   platform notification gateway, with settle-all failure tolerance
//! - **Local Wall-Clock Time**: the engine makes no time-zone conversions;
//!   everything happens in the caller's local time
//!
//! ## Core Modules
//!
//! - [`models`]: Read models for tasks, recurrence rules, and settings
//! - [`calendar`]: Local date/time arithmetic helpers
//! - [`recurrence`]: Next-occurrence resolver and bounded enumerator
//! - [`scheduler`]: Notification gateway trait and the scheduling pass
//! - [`config`]: Scheduling bounds loaded from file/environment
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Local;
//! use tend_core::models::{RecurrenceRule, ReminderTimeOfDay, Task};
//! use tend_core::recurrence::future_occurrences;
//!
//! # fn main() -> Result<(), tend_core::error::CoreError> {
//! let task = Task {
//!     title: "Morning medication".to_string(),
//!     reminder_time: ReminderTimeOfDay::new(8, 30)?,
//!     recurrence: Some(RecurrenceRule::weekly(1, [1, 3, 5])),
//!     ..Task::default()
//! };
//!
//! let upcoming = future_occurrences(&task, Local::now().naive_local(), 2, 10);
//! for date in upcoming {
//!     println!("due on {date}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod scheduler;
