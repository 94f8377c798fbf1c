//! SQLite persistence for Fidela — clients, outreach tasks, message log.
//!
//! One `Store` handle owns the connection and is passed explicitly to every
//! pipeline (no ambient/global database state). WAL mode allows the daily
//! scheduler, a running broadcast worker, and operator commands to hit the
//! same file concurrently.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use fidela_core::error::{FidelaError, Result};
use fidela_core::types::{Client, LogEntry, LogOutcome, NewClient, RuleKind, Task, TaskStatus};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_clients: usize,
    pub pending_tasks: usize,
    pub birthdays_today: usize,
}

/// Store handle — clients, tasks, and the append-only message log.
pub struct Store {
    conn: Mutex<Connection>,
}

const CLIENT_SELECT: &str =
    "SELECT id, name, phone, birth_date, last_appointment, last_contacted, created_at FROM clients";
const TASK_SELECT: &str =
    "SELECT id, client_id, task_type, scheduled_for, status, message, created_at, sent_at, error FROM tasks";

fn store_err(ctx: &str, e: rusqlite::Error) -> FidelaError {
    FidelaError::Store(format!("{ctx}: {e}"))
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn parse_date(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        birth_date: parse_date(row.get(3)?),
        last_appointment: parse_date(row.get(4)?),
        last_contacted: parse_date(row.get(5)?),
        created_at: parse_ts(&row.get::<_, String>(6)?),
    })
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let kind: String = row.get(2)?;
    let status: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        client_id: row.get(1)?,
        kind: RuleKind::parse(&kind).unwrap_or(RuleKind::FollowUp),
        scheduled_for: parse_date(row.get(3)?).unwrap_or_default(),
        status: TaskStatus::parse(&status).unwrap_or(TaskStatus::Pending),
        message: row.get(5)?,
        created_at: parse_ts(&row.get::<_, String>(6)?),
        sent_at: row.get::<_, Option<String>>(7)?.map(|s| parse_ts(&s)),
        error: row.get(8)?,
    })
}

impl Store {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|e| store_err("DB open", e))?;

        // WAL allows the scheduler, broadcast worker, and operator commands
        // to share the file without "database is locked" errors.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| store_err("DB pragma", e))?;

        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| store_err("DB open", e))?;
        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FidelaError::Store(format!("DB lock poisoned: {e}")))
    }

    /// Run schema migrations.
    fn migrate(&self) -> Result<()> {
        self.lock()?
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                birth_date TEXT,
                last_appointment TEXT,
                last_contacted TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER NOT NULL,
                task_type TEXT NOT NULL,
                scheduled_for TEXT NOT NULL,
                status TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL,
                sent_at TEXT,
                error TEXT,
                FOREIGN KEY (client_id) REFERENCES clients (id)
            );

            CREATE TABLE IF NOT EXISTS message_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER,
                phone TEXT NOT NULL,
                message TEXT NOT NULL,
                message_type TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                error TEXT,
                FOREIGN KEY (client_id) REFERENCES clients (id)
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_dedup
                ON tasks (client_id, task_type, created_at);
            CREATE INDEX IF NOT EXISTS idx_tasks_due
                ON tasks (status, scheduled_for);
         ",
            )
            .map_err(|e| store_err("Migration", e))?;
        Ok(())
    }

    // ─── Clients ──────────────────────────────────────

    /// Insert a client. Rejects missing name/phone without touching the store.
    pub fn insert_client(&self, new: &NewClient) -> Result<i64> {
        new.validate()?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO clients (name, phone, birth_date, last_appointment, last_contacted, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.name.trim(),
                new.phone.trim(),
                new.birth_date.map(fmt_date),
                new.last_appointment.map(fmt_date),
                new.last_contacted.map(fmt_date),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| store_err("Insert client", e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace a client's editable fields.
    pub fn update_client(&self, id: i64, new: &NewClient) -> Result<()> {
        new.validate()?;
        self.lock()?
            .execute(
                "UPDATE clients
                 SET name = ?1, phone = ?2, birth_date = ?3, last_appointment = ?4, last_contacted = ?5
                 WHERE id = ?6",
                params![
                    new.name.trim(),
                    new.phone.trim(),
                    new.birth_date.map(fmt_date),
                    new.last_appointment.map(fmt_date),
                    new.last_contacted.map(fmt_date),
                    id,
                ],
            )
            .map_err(|e| store_err("Update client", e))?;
        Ok(())
    }

    /// Delete clients and cascade to their tasks and log entries.
    pub fn delete_clients(&self, ids: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        for id in ids {
            conn.execute("DELETE FROM clients WHERE id = ?1", [id])
                .map_err(|e| store_err("Delete client", e))?;
            conn.execute("DELETE FROM tasks WHERE client_id = ?1", [id])
                .map_err(|e| store_err("Delete client tasks", e))?;
            conn.execute("DELETE FROM message_log WHERE client_id = ?1", [id])
                .map_err(|e| store_err("Delete client log", e))?;
        }
        Ok(())
    }

    pub fn get_client(&self, id: i64) -> Result<Option<Client>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{CLIENT_SELECT} WHERE id = ?1"))
            .map_err(|e| store_err("Get client", e))?;
        Ok(stmt.query_row([id], row_to_client).ok())
    }

    /// All clients, in name order (repeatable iteration order for runs).
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{CLIENT_SELECT} ORDER BY name"))
            .map_err(|e| store_err("List clients", e))?;
        let rows = stmt
            .query_map([], row_to_client)
            .map_err(|e| store_err("List clients", e))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Stamp a client's last-contacted day after a successful send.
    pub fn set_last_contacted(&self, client_id: i64, day: NaiveDate) -> Result<()> {
        self.lock()?
            .execute(
                "UPDATE clients SET last_contacted = ?1 WHERE id = ?2",
                params![fmt_date(day), client_id],
            )
            .map_err(|e| store_err("Update last_contacted", e))?;
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────

    /// Insert a new pending task.
    pub fn insert_task(
        &self,
        client_id: i64,
        kind: RuleKind,
        scheduled_for: NaiveDate,
        message: &str,
    ) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tasks (client_id, task_type, scheduled_for, status, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                client_id,
                kind.as_str(),
                fmt_date(scheduled_for),
                TaskStatus::Pending.as_str(),
                message,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| store_err("Insert task", e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Dedup guard: does any task of this (client, kind) exist with a
    /// creation timestamp on or after `cutoff`? Status is deliberately
    /// ignored — sent, failed, and pending tasks all hold the cooldown.
    pub fn has_recent_task(&self, client_id: i64, kind: RuleKind, cutoff: NaiveDate) -> Result<bool> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM tasks
                 WHERE client_id = ?1 AND task_type = ?2 AND created_at >= ?3
                 LIMIT 1",
                params![client_id, kind.as_str(), fmt_date(cutoff)],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| store_err("Dedup query", e))?;
        Ok(found.is_some())
    }

    /// Pending tasks due on or before `today`, each with its owner's phone.
    pub fn due_tasks(&self, today: NaiveDate) -> Result<Vec<(Task, String)>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT tasks.id, tasks.client_id, tasks.task_type, tasks.scheduled_for,
                        tasks.status, tasks.message, tasks.created_at, tasks.sent_at, tasks.error,
                        clients.phone
                 FROM tasks
                 JOIN clients ON clients.id = tasks.client_id
                 WHERE tasks.status = 'pending' AND tasks.scheduled_for <= ?1",
            )
            .map_err(|e| store_err("Due tasks", e))?;
        let rows = stmt
            .query_map([fmt_date(today)], |row| {
                let task = row_to_task(row)?;
                let phone: String = row.get(9)?;
                Ok((task, phone))
            })
            .map_err(|e| store_err("Due tasks", e))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{TASK_SELECT} WHERE id = ?1"))
            .map_err(|e| store_err("Get task", e))?;
        Ok(stmt.query_row([id], row_to_task).ok())
    }

    /// Most recently created tasks first.
    pub fn list_tasks(&self, limit: usize) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{TASK_SELECT} ORDER BY created_at DESC LIMIT ?1"))
            .map_err(|e| store_err("List tasks", e))?;
        let rows = stmt
            .query_map([limit as i64], row_to_task)
            .map_err(|e| store_err("List tasks", e))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn mark_task_sent(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        self.lock()?
            .execute(
                "UPDATE tasks SET status = 'sent', sent_at = ?1 WHERE id = ?2",
                params![at.to_rfc3339(), id],
            )
            .map_err(|e| store_err("Mark task sent", e))?;
        Ok(())
    }

    pub fn mark_task_failed(&self, id: i64, error: &str) -> Result<()> {
        self.lock()?
            .execute(
                "UPDATE tasks SET status = 'failed', error = ?1 WHERE id = ?2",
                params![error, id],
            )
            .map_err(|e| store_err("Mark task failed", e))?;
        Ok(())
    }

    /// Flip a task between `done` and `pending`. Untoggling collapses any
    /// prior terminal status to `pending` (the documented behavior). An
    /// existing sent timestamp is preserved; toggling to done stamps one.
    /// Returns the new status, or None for an unknown id.
    pub fn toggle_task(&self, id: i64) -> Result<Option<TaskStatus>> {
        let conn = self.lock()?;
        let current: Option<String> = conn
            .query_row("SELECT status FROM tasks WHERE id = ?1", [id], |row| row.get(0))
            .optional()
            .map_err(|e| store_err("Toggle task", e))?;
        let Some(current) = current else {
            return Ok(None);
        };
        let new_status = if current != "done" { TaskStatus::Done } else { TaskStatus::Pending };
        conn.execute(
            "UPDATE tasks SET status = ?1, sent_at = COALESCE(sent_at, ?2) WHERE id = ?3",
            params![new_status.as_str(), Utc::now().to_rfc3339(), id],
        )
        .map_err(|e| store_err("Toggle task", e))?;
        Ok(Some(new_status))
    }

    /// Force tasks to `done`, keeping an existing sent timestamp or stamping
    /// one now.
    pub fn mark_tasks_done(&self, ids: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        for id in ids {
            conn.execute(
                "UPDATE tasks SET status = 'done', sent_at = COALESCE(sent_at, ?1) WHERE id = ?2",
                params![now, id],
            )
            .map_err(|e| store_err("Mark tasks done", e))?;
        }
        Ok(())
    }

    pub fn delete_tasks(&self, ids: &[i64]) -> Result<()> {
        let conn = self.lock()?;
        for id in ids {
            conn.execute("DELETE FROM tasks WHERE id = ?1", [id])
                .map_err(|e| store_err("Delete task", e))?;
        }
        Ok(())
    }

    // ─── Message log ──────────────────────────────────────

    /// Append one send-attempt record. The log is append-only; nothing
    /// updates or deletes entries except the client cascade.
    pub fn append_log(
        &self,
        client_id: Option<i64>,
        phone: &str,
        message: &str,
        kind: &str,
        outcome: LogOutcome,
        error: Option<&str>,
    ) -> Result<()> {
        self.lock()?
            .execute(
                "INSERT INTO message_log (client_id, phone, message, message_type, status, created_at, error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    client_id,
                    phone,
                    message,
                    kind,
                    outcome.as_str(),
                    Utc::now().to_rfc3339(),
                    error,
                ],
            )
            .map_err(|e| store_err("Append log", e))?;
        Ok(())
    }

    /// Most recent log entries first.
    pub fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, client_id, phone, message, message_type, status, created_at, error
                 FROM message_log ORDER BY created_at DESC, id DESC LIMIT ?1",
            )
            .map_err(|e| store_err("Recent log", e))?;
        let rows = stmt
            .query_map([limit as i64], |row| {
                let outcome: String = row.get(5)?;
                Ok(LogEntry {
                    id: row.get(0)?,
                    client_id: row.get(1)?,
                    phone: row.get(2)?,
                    message: row.get(3)?,
                    kind: row.get(4)?,
                    outcome: LogOutcome::parse(&outcome).unwrap_or(LogOutcome::Failed),
                    created_at: parse_ts(&row.get::<_, String>(6)?),
                    error: row.get(7)?,
                })
            })
            .map_err(|e| store_err("Recent log", e))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    // ─── Stats ──────────────────────────────────────

    /// Dashboard counters: clients, pending tasks, birthdays today.
    pub fn stats(&self, today: NaiveDate) -> Result<Stats> {
        let conn = self.lock()?;
        let total_clients: i64 = conn
            .query_row("SELECT COUNT(*) FROM clients", [], |r| r.get(0))
            .map_err(|e| store_err("Stats", e))?;
        let pending_tasks: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE status = 'pending'", [], |r| r.get(0))
            .map_err(|e| store_err("Stats", e))?;
        let birthdays_today: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM clients
                 WHERE birth_date IS NOT NULL AND substr(birth_date, 6, 5) = ?1",
                [today.format("%m-%d").to_string()],
                |r| r.get(0),
            )
            .map_err(|e| store_err("Stats", e))?;
        Ok(Stats {
            total_clients: total_clients as usize,
            pending_tasks: pending_tasks as usize,
            birthdays_today: birthdays_today as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, phone: &str) -> NewClient {
        NewClient { name: name.into(), phone: phone.into(), ..Default::default() }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn insert_and_list_clients() {
        let store = Store::open_in_memory().unwrap();
        store.insert_client(&client("Bia", "+5511988880000")).unwrap();
        store.insert_client(&client("Ana", "+5511999990000")).unwrap();

        let clients = store.list_clients().unwrap();
        assert_eq!(clients.len(), 2);
        // name order
        assert_eq!(clients[0].name, "Ana");
        assert_eq!(clients[1].name, "Bia");
    }

    #[test]
    fn insert_rejects_missing_fields() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.insert_client(&client("", "+55")).is_err());
        assert!(store.insert_client(&client("Ana", "")).is_err());
        assert!(store.list_clients().unwrap().is_empty());
    }

    #[test]
    fn update_client_replaces_fields() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+55")).unwrap();
        let mut edit = client("Ana Paula", "+5511");
        edit.birth_date = Some(date("1990-04-12"));
        store.update_client(id, &edit).unwrap();

        let got = store.get_client(id).unwrap().unwrap();
        assert_eq!(got.name, "Ana Paula");
        assert_eq!(got.birth_date, Some(date("1990-04-12")));
        assert_eq!(got.last_appointment, None);
    }

    #[test]
    fn dedup_guard_blocks_within_cutoff() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+55")).unwrap();
        store.insert_task(id, RuleKind::FollowUp, date("2026-08-30"), "oi").unwrap();

        // created_at is now; a cutoff in the past finds it, a future one does not
        assert!(store.has_recent_task(id, RuleKind::FollowUp, date("2020-01-01")).unwrap());
        assert!(!store.has_recent_task(id, RuleKind::FollowUp, date("2099-01-01")).unwrap());
        // other kinds unaffected
        assert!(!store.has_recent_task(id, RuleKind::Birthday, date("2020-01-01")).unwrap());
    }

    #[test]
    fn due_tasks_joins_phone_and_filters_status() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+5511999990000")).unwrap();
        let t1 = store.insert_task(id, RuleKind::FollowUp, date("2026-08-29"), "a").unwrap();
        store.insert_task(id, RuleKind::Birthday, date("2099-01-01"), "b").unwrap();

        let due = store.due_tasks(date("2026-08-30")).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0.id, t1);
        assert_eq!(due[0].1, "+5511999990000");

        store.mark_task_sent(t1, Utc::now()).unwrap();
        assert!(store.due_tasks(date("2026-08-30")).unwrap().is_empty());
    }

    #[test]
    fn mark_failed_records_error() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+55")).unwrap();
        let t = store.insert_task(id, RuleKind::Reengage, date("2026-08-30"), "oi").unwrap();
        store.mark_task_failed(t, "network unreachable").unwrap();

        let task = store.get_task(t).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("network unreachable"));
        assert!(task.sent_at.is_none());
    }

    #[test]
    fn toggle_flips_done_and_back_to_pending() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+55")).unwrap();
        let t = store.insert_task(id, RuleKind::FollowUp, date("2026-08-30"), "oi").unwrap();

        assert_eq!(store.toggle_task(t).unwrap(), Some(TaskStatus::Done));
        assert_eq!(store.toggle_task(t).unwrap(), Some(TaskStatus::Pending));
        assert_eq!(store.toggle_task(9999).unwrap(), None);
    }

    #[test]
    fn bulk_done_preserves_existing_sent_at() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_client(&client("Ana", "+55")).unwrap();
        let sent = store.insert_task(id, RuleKind::FollowUp, date("2026-08-30"), "a").unwrap();
        let fresh = store.insert_task(id, RuleKind::Birthday, date("2026-08-30"), "b").unwrap();

        let stamp = Utc::now() - chrono::Duration::days(2);
        store.mark_task_sent(sent, stamp).unwrap();
        store.mark_tasks_done(&[sent, fresh]).unwrap();

        let a = store.get_task(sent).unwrap().unwrap();
        let b = store.get_task(fresh).unwrap().unwrap();
        assert_eq!(a.status, TaskStatus::Done);
        assert_eq!(b.status, TaskStatus::Done);
        assert_eq!(a.sent_at.unwrap().timestamp(), stamp.timestamp());
        assert!(b.sent_at.is_some());
    }

    #[test]
    fn delete_client_cascades_and_spares_others() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_client(&client("Ana", "+55a")).unwrap();
        let b = store.insert_client(&client("Bia", "+55b")).unwrap();
        store.insert_task(a, RuleKind::FollowUp, date("2026-08-30"), "a").unwrap();
        let tb = store.insert_task(b, RuleKind::FollowUp, date("2026-08-30"), "b").unwrap();
        store.append_log(Some(a), "+55a", "a", "cut_reminder", LogOutcome::Sent, None).unwrap();
        store.append_log(Some(b), "+55b", "b", "promo", LogOutcome::Sent, None).unwrap();

        store.delete_clients(&[a]).unwrap();

        assert!(store.get_client(a).unwrap().is_none());
        assert!(store.get_client(b).unwrap().is_some());
        let tasks = store.list_tasks(10).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, tb);
        let log = store.recent_log(10).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].client_id, Some(b));
    }

    #[test]
    fn log_is_append_only_and_ordered() {
        let store = Store::open_in_memory().unwrap();
        store.append_log(None, "+55", "first", "promo", LogOutcome::Sent, None).unwrap();
        store.append_log(None, "+55", "second", "promo", LogOutcome::Failed, Some("boom")).unwrap();

        let log = store.recent_log(10).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].message, "second");
        assert_eq!(log[0].outcome, LogOutcome::Failed);
        assert_eq!(log[0].error.as_deref(), Some("boom"));
        assert_eq!(log[1].outcome, LogOutcome::Sent);
    }

    #[test]
    fn stats_counts_birthdays_regardless_of_year() {
        let store = Store::open_in_memory().unwrap();
        let mut c = client("Ana", "+55");
        c.birth_date = Some(date("1990-08-30"));
        store.insert_client(&c).unwrap();
        let mut c2 = client("Bia", "+55");
        c2.birth_date = Some(date("2001-12-25"));
        store.insert_client(&c2).unwrap();
        let id = store.insert_client(&client("Clo", "+55")).unwrap();
        store.insert_task(id, RuleKind::FollowUp, date("2026-08-30"), "oi").unwrap();

        let stats = store.stats(date("2026-08-30")).unwrap();
        assert_eq!(stats.total_clients, 3);
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.birthdays_today, 1);
    }
}
