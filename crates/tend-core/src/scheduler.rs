//! Reminder scheduling pass: cancel everything previously scheduled, then
//! re-issue primary and overdue notifications for every upcoming occurrence.
//!
//! The pass is a full reset rather than an incremental diff. That trades a
//! brief window with nothing scheduled for never having to keep a per-task
//! notification-id index.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::calendar::occurrence_instant;
use crate::config::SchedulerConfig;
use crate::error::CoreError;
use crate::models::{
    NotificationCategory, NotificationPayload, ReminderSettings, SchedulePassSummary, Task,
};
use crate::recurrence::future_occurrences;

/// Capability interface over the platform's delayed-notification service.
///
/// Implementations live outside this crate (mobile bridge, test doubles);
/// the engine performs no I/O of its own.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Cancels every notification previously scheduled by this subsystem.
    async fn cancel_all(&self) -> Result<(), CoreError>;

    /// Schedules one delayed notification, returning the platform's id.
    async fn schedule(
        &self,
        payload: NotificationPayload,
        trigger_at: NaiveDateTime,
    ) -> Result<String, CoreError>;
}

/// Orchestrates one scheduling pass over a set of tasks.
pub struct ReminderScheduler<G: NotificationGateway + 'static> {
    gateway: Arc<G>,
    config: SchedulerConfig,
}

impl<G: NotificationGateway + 'static> ReminderScheduler<G> {
    pub fn new(gateway: Arc<G>, config: SchedulerConfig) -> Self {
        Self { gateway, config }
    }

    pub fn with_defaults(gateway: Arc<G>) -> Self {
        Self::new(gateway, SchedulerConfig::default())
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Recomputes and reschedules all reminders for `tasks`.
    ///
    /// Cancel-all is awaited before any new request goes out; if it fails the
    /// pass is abandoned and the error propagates, so a stale schedule is
    /// never mixed with a fresh one. The schedule requests themselves are
    /// issued concurrently and awaited to settlement: a failing request is
    /// logged and counted, never allowed to abort its siblings.
    ///
    /// Callers are expected to serialize passes (one per task-list or
    /// settings change); the engine holds no state between passes.
    pub async fn refresh_schedule(
        &self,
        tasks: &[Task],
        settings: &ReminderSettings,
        now: NaiveDateTime,
    ) -> Result<SchedulePassSummary, CoreError> {
        let started = Instant::now();

        // No new notification may be issued while stale ones might exist.
        self.gateway.cancel_all().await?;

        let mut requests: Vec<(NotificationPayload, NaiveDateTime)> = Vec::new();
        for task in tasks {
            let dates = future_occurrences(
                task,
                now,
                self.config.lookahead_months,
                self.config.max_per_task,
            );
            debug!(task_id = %task.id, occurrences = dates.len(), "resolved occurrences");
            for date in dates {
                let instant = occurrence_instant(date, task.reminder_time);
                if settings.enable_reminder {
                    requests.push((
                        build_payload(task, NotificationCategory::Reminder, instant),
                        instant,
                    ));
                }
                if settings.enable_overdue_reminder {
                    let overdue_at =
                        instant + Duration::minutes(i64::from(settings.overdue_delay_minutes));
                    requests.push((
                        build_payload(task, NotificationCategory::Overdue, overdue_at),
                        overdue_at,
                    ));
                }
            }
        }

        let mut summary = SchedulePassSummary {
            tasks_processed: tasks.len(),
            requests_issued: requests.len(),
            ..Default::default()
        };

        let mut in_flight = JoinSet::new();
        for (payload, trigger_at) in requests {
            let gateway = Arc::clone(&self.gateway);
            in_flight.spawn(async move {
                let correlation_id = payload.correlation_id.clone();
                gateway
                    .schedule(payload, trigger_at)
                    .await
                    .map_err(|err| (correlation_id, err))
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok(Ok(_platform_id)) => summary.scheduled += 1,
                Ok(Err((correlation_id, err))) => {
                    warn!(%correlation_id, error = %err, "failed to schedule notification");
                    summary.failed += 1;
                    summary.errors.push(format!("{correlation_id}: {err}"));
                }
                Err(join_err) => {
                    warn!(error = %join_err, "schedule request task failed to run");
                    summary.failed += 1;
                    summary.errors.push(join_err.to_string());
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            tasks = summary.tasks_processed,
            scheduled = summary.scheduled,
            failed = summary.failed,
            "reminder schedule refreshed"
        );
        Ok(summary)
    }
}

fn build_payload(
    task: &Task,
    category: NotificationCategory,
    trigger_at: NaiveDateTime,
) -> NotificationPayload {
    let correlation_id = format!(
        "{}_{}_{}",
        category,
        task.id,
        trigger_at.and_utc().timestamp()
    );
    let body = match category {
        NotificationCategory::Reminder => format!("It's time for \"{}\"", task.title),
        NotificationCategory::Overdue => format!("\"{}\" is still waiting on you", task.title),
    };
    NotificationPayload {
        title: task.title.clone(),
        body,
        category,
        correlation_id,
        task_id: task.id,
    }
}
