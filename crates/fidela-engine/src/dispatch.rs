//! Dispatch Pipeline — deliver due pending tasks and record every outcome.

use chrono::{NaiveDate, Utc};

use fidela_core::error::Result;
use fidela_core::traits::Sender;
use fidela_core::types::LogOutcome;
use fidela_store::Store;

/// What one dispatch run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Attempt delivery of every pending task with `scheduled_for <= today`.
///
/// Per-task isolation: a Sender failure marks that task `failed` and moves
/// on; it never aborts the loop. Failed tasks are never retried here — the
/// rule's cooldown decides when the client becomes eligible again.
pub async fn dispatch(store: &Store, sender: &dyn Sender, today: NaiveDate) -> Result<DispatchReport> {
    let due = store.due_tasks(today)?;
    let mut report = DispatchReport { attempted: due.len(), ..Default::default() };

    for (task, phone) in due {
        match sender.send(&phone, &task.message, None).await {
            Ok(()) => {
                store.mark_task_sent(task.id, Utc::now())?;
                store.set_last_contacted(task.client_id, today)?;
                store.append_log(
                    Some(task.client_id),
                    &phone,
                    &task.message,
                    task.kind.as_str(),
                    LogOutcome::Sent,
                    None,
                )?;
                report.sent += 1;
            }
            Err(e) => {
                let reason = e.to_string();
                store.mark_task_failed(task.id, &reason)?;
                store.append_log(
                    Some(task.client_id),
                    &phone,
                    &task.message,
                    task.kind.as_str(),
                    LogOutcome::Failed,
                    Some(&reason),
                )?;
                report.failed += 1;
                tracing::warn!(task = task.id, "send failed: {reason}");
            }
        }
    }

    if report.attempted > 0 {
        tracing::info!(
            "📤 Dispatch: {} attempted, {} sent, {} failed",
            report.attempted,
            report.sent,
            report.failed
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSender;
    use fidela_core::types::{NewClient, RuleKind, TaskStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seed(store: &Store) -> (i64, i64) {
        let client_id = store
            .insert_client(&NewClient {
                name: "Ana".into(),
                phone: "+5511999990000".into(),
                ..Default::default()
            })
            .unwrap();
        let task_id = store
            .insert_task(client_id, RuleKind::FollowUp, date("2026-08-30"), "oi Ana")
            .unwrap();
        (client_id, task_id)
    }

    #[tokio::test]
    async fn success_marks_sent_and_stamps_contact() {
        let store = Store::open_in_memory().unwrap();
        let (client_id, task_id) = seed(&store);
        let sender = MockSender::ok();

        let report = dispatch(&store, &sender, date("2026-08-30")).await.unwrap();
        assert_eq!(report, DispatchReport { attempted: 1, sent: 1, failed: 0 });

        let task = store.get_task(task_id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Sent);
        assert!(task.sent_at.is_some());

        let client = store.get_client(client_id).unwrap().unwrap();
        assert_eq!(client.last_contacted, Some(date("2026-08-30")));

        let log = store.recent_log(10).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].outcome, LogOutcome::Sent);
        assert_eq!(log[0].kind, "cut_reminder");
    }

    #[tokio::test]
    async fn failure_records_error_and_leaves_contact_untouched() {
        let store = Store::open_in_memory().unwrap();
        let (client_id, task_id) = seed(&store);
        let sender = MockSender::failing();

        let report = dispatch(&store, &sender, date("2026-08-30")).await.unwrap();
        assert_eq!(report, DispatchReport { attempted: 1, sent: 0, failed: 1 });

        let task = store.get_task(task_id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.error.as_deref().unwrap_or("").contains("mock send refused"));

        let client = store.get_client(client_id).unwrap().unwrap();
        assert_eq!(client.last_contacted, None);

        let log = store.recent_log(10).unwrap();
        assert_eq!(log[0].outcome, LogOutcome::Failed);
        assert!(log[0].error.is_some());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_rest() {
        let store = Store::open_in_memory().unwrap();
        seed(&store);
        let other = store
            .insert_client(&NewClient {
                name: "Bia".into(),
                phone: "+5511988880000".into(),
                ..Default::default()
            })
            .unwrap();
        store.insert_task(other, RuleKind::Birthday, date("2026-08-30"), "parabéns").unwrap();

        // fails every send, yet both tasks are attempted and resolved
        let sender = MockSender::failing();
        let report = dispatch(&store, &sender, date("2026-08-30")).await.unwrap();
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(sender.call_count(), 2);
    }

    #[tokio::test]
    async fn future_tasks_are_not_dispatched() {
        let store = Store::open_in_memory().unwrap();
        let (_, _) = seed(&store);
        let sender = MockSender::ok();

        let report = dispatch(&store, &sender, date("2026-08-29")).await.unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(sender.call_count(), 0);
    }
}
