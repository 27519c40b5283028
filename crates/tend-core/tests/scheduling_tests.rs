//! End-to-end tests for a full scheduling pass: task set in, gateway
//! requests out.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tend_core::config::SchedulerConfig;
use tend_core::error::CoreError;
use tend_core::models::{
    NotificationCategory, NotificationPayload, RecurrenceRule, ReminderSettings,
    ReminderTimeOfDay, Task,
};
use tend_core::scheduler::{NotificationGateway, ReminderScheduler};

/// Wednesday noon.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn task(
    title: &str,
    recurrence: Option<RecurrenceRule>,
    anchor: NaiveDate,
    hour: u32,
) -> Task {
    Task {
        title: title.to_string(),
        recurrence,
        created_at: anchor.and_hms_opt(9, 0, 0).unwrap(),
        reminder_time: ReminderTimeOfDay::new(hour, 0).unwrap(),
        ..Task::default()
    }
}

#[derive(Default)]
struct RecordingGateway {
    requests: Mutex<Vec<(NotificationPayload, NaiveDateTime)>>,
}

impl RecordingGateway {
    fn requests(&self) -> Vec<(NotificationPayload, NaiveDateTime)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn cancel_all(&self) -> Result<(), CoreError> {
        self.requests.lock().unwrap().clear();
        Ok(())
    }

    async fn schedule(
        &self,
        payload: NotificationPayload,
        trigger_at: NaiveDateTime,
    ) -> Result<String, CoreError> {
        let id = format!("n-{}", payload.correlation_id);
        self.requests.lock().unwrap().push((payload, trigger_at));
        Ok(id)
    }
}

#[tokio::test]
async fn mixed_task_set_schedules_only_live_occurrences() {
    let gateway = Arc::new(RecordingGateway::default());
    let scheduler = ReminderScheduler::new(
        Arc::clone(&gateway),
        SchedulerConfig {
            lookahead_months: 1,
            max_per_task: 5,
        },
    );
    let settings = ReminderSettings {
        enable_reminder: true,
        enable_overdue_reminder: true,
        overdue_delay_minutes: 20,
    };

    let tasks = vec![
        // Fires daily at 18:00, today included.
        task("Evening meds", Some(RecurrenceRule::daily(1)), d(2024, 5, 1), 18),
        // Weekly on Wednesdays at 08:00; today's slot has passed.
        task(
            "Pharmacy run",
            Some(RecurrenceRule::weekly(1, [3])),
            d(2024, 5, 1),
            8,
        ),
        // One-shot anchored in the past: contributes nothing.
        task("Setup visit", None, d(2024, 5, 10), 10),
    ];

    let summary = scheduler
        .refresh_schedule(&tasks, &settings, now())
        .await
        .unwrap();

    assert_eq!(summary.tasks_processed, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.scheduled, summary.requests_issued);

    let requests = gateway.requests();
    assert_eq!(requests.len(), summary.scheduled);

    // 5 daily (capped) + 4 weekly occurrences, each with a primary and an
    // overdue.
    assert_eq!(requests.len(), 18);

    // Every trigger lies strictly in the future.
    assert!(requests.iter().all(|(_, at)| *at > now()));

    // The one-shot task contributed nothing.
    assert!(requests.iter().all(|(p, _)| p.title != "Setup visit"));

    // The weekly task starts next Wednesday, not today.
    let first_weekly = requests
        .iter()
        .filter(|(p, _)| p.title == "Pharmacy run")
        .map(|(_, at)| *at)
        .min()
        .unwrap();
    assert_eq!(
        first_weekly,
        d(2024, 5, 22).and_hms_opt(8, 0, 0).unwrap()
    );

    // Overdue triggers sit exactly 20 minutes behind their primaries.
    for (payload, at) in requests
        .iter()
        .filter(|(p, _)| p.category == NotificationCategory::Overdue)
    {
        let primary_at = *at - Duration::minutes(20);
        assert!(requests.iter().any(|(p, t)| {
            p.category == NotificationCategory::Reminder
                && p.task_id == payload.task_id
                && *t == primary_at
        }));
    }
}

#[tokio::test]
async fn repeated_passes_reset_rather_than_accumulate() {
    let gateway = Arc::new(RecordingGateway::default());
    let scheduler = ReminderScheduler::new(
        Arc::clone(&gateway),
        SchedulerConfig {
            lookahead_months: 1,
            max_per_task: 3,
        },
    );
    let settings = ReminderSettings {
        enable_overdue_reminder: false,
        ..ReminderSettings::default()
    };
    let tasks = vec![task(
        "Hydration",
        Some(RecurrenceRule::daily(1)),
        d(2024, 5, 1),
        18,
    )];

    scheduler
        .refresh_schedule(&tasks, &settings, now())
        .await
        .unwrap();
    let first = gateway.requests().len();

    scheduler
        .refresh_schedule(&tasks, &settings, now())
        .await
        .unwrap();
    let second = gateway.requests().len();

    // Cancel-all wipes the previous pass, so the count stays flat.
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_task_list_is_a_clean_reset() {
    let gateway = Arc::new(RecordingGateway::default());
    let scheduler = ReminderScheduler::with_defaults(Arc::clone(&gateway));

    let summary = scheduler
        .refresh_schedule(&[], &ReminderSettings::default(), now())
        .await
        .unwrap();

    assert_eq!(summary.tasks_processed, 0);
    assert_eq!(summary.requests_issued, 0);
    assert!(gateway.requests().is_empty());
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}
