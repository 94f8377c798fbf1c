//! Domain model — clients, outreach tasks, and the message audit log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of recurring outreach rules.
///
/// String values match the `task_type` column so existing databases stay
/// readable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Post-service follow-up: 3 months after the last appointment.
    FollowUp,
    /// Re-engagement nudge: 20+ days without contact.
    Reengage,
    /// Birthday greeting.
    Birthday,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [RuleKind::FollowUp, RuleKind::Reengage, RuleKind::Birthday];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::FollowUp => "cut_reminder",
            RuleKind::Reengage => "affection",
            RuleKind::Birthday => "birthday",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cut_reminder" => Some(RuleKind::FollowUp),
            "affection" => Some(RuleKind::Reengage),
            "birthday" => Some(RuleKind::Birthday),
            _ => None,
        }
    }

    /// Minimum days since the last task of this kind (any status) before a
    /// new one may be created for the same client.
    pub fn cooldown_days(&self) -> i64 {
        match self {
            RuleKind::FollowUp => 60,
            RuleKind::Reengage => 10,
            RuleKind::Birthday => 300,
        }
    }
}

/// Lifecycle of an outreach task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Sent,
    Failed,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Sent => "sent",
            TaskStatus::Failed => "failed",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "sent" => Some(TaskStatus::Sent),
            "failed" => Some(TaskStatus::Failed),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// A client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub last_appointment: Option<NaiveDate>,
    pub last_contacted: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or editing a client. `name` and `phone` are required;
/// empty values are rejected before any store mutation.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub last_appointment: Option<NaiveDate>,
    pub last_contacted: Option<NaiveDate>,
}

impl NewClient {
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::FidelaError::Validation("client name is required".into()));
        }
        if self.phone.trim().is_empty() {
            return Err(crate::FidelaError::Validation("client phone is required".into()));
        }
        Ok(())
    }
}

/// One outreach obligation, fully rendered and carried from creation through
/// delivery or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub client_id: i64,
    pub kind: RuleKind,
    pub scheduled_for: NaiveDate,
    pub status: TaskStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Outcome recorded in the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutcome {
    Sent,
    Failed,
}

impl LogOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOutcome::Sent => "sent",
            LogOutcome::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(LogOutcome::Sent),
            "failed" => Some(LogOutcome::Failed),
            _ => None,
        }
    }
}

/// Append-only audit record of one send attempt.
///
/// `kind` is a rule kind string for task-driven sends or `"promo"` for
/// broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub client_id: Option<i64>,
    pub phone: String,
    pub message: String,
    pub kind: String,
    pub outcome: LogOutcome,
    pub created_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Message log kind used by the broadcast pipeline.
pub const PROMO_KIND: &str = "promo";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_kind_roundtrip() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RuleKind::parse("promo"), None);
    }

    #[test]
    fn cooldowns() {
        assert_eq!(RuleKind::FollowUp.cooldown_days(), 60);
        assert_eq!(RuleKind::Reengage.cooldown_days(), 10);
        assert_eq!(RuleKind::Birthday.cooldown_days(), 300);
    }

    #[test]
    fn new_client_requires_name_and_phone() {
        let ok = NewClient { name: "Ana".into(), phone: "+5511999990000".into(), ..Default::default() };
        assert!(ok.validate().is_ok());

        let no_phone = NewClient { name: "Ana".into(), ..Default::default() };
        assert!(no_phone.validate().is_err());

        let blank_name = NewClient { name: "  ".into(), phone: "+55".into(), ..Default::default() };
        assert!(blank_name.validate().is_err());
    }
}
