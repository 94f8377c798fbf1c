//! Rule Evaluator — pure mapping from a client's stored dates and "today"
//! to candidate outreach messages. No store access, no clocks.

use chrono::{Datelike, Months, NaiveDate};

use fidela_core::types::{Client, RuleKind};

/// One positive rule outcome: the kind plus the fully rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: RuleKind,
    pub message: String,
}

/// Evaluate all three rules for one client. Rules are independent; a client
/// may yield up to three candidates on the same day.
pub fn evaluate(client: &Client, today: NaiveDate) -> Vec<Candidate> {
    let mut out = Vec::new();

    if let Some(last_appt) = client.last_appointment
        && followup_due(last_appt, today)
    {
        out.push(Candidate {
            kind: RuleKind::FollowUp,
            message: format!(
                "Oi {}! Já faz 3 meses do último corte. Quer agendar um horário?",
                client.name
            ),
        });
    }

    if let Some(last_contacted) = client.last_contacted
        && (today - last_contacted).num_days() >= 20
    {
        out.push(Candidate {
            kind: RuleKind::Reengage,
            message: format!("Oi {}! Tudo bem? Passando pra deixar um carinho 💛", client.name),
        });
    }

    if let Some(birth) = client.birth_date
        && birth.month() == today.month()
        && birth.day() == today.day()
    {
        out.push(Candidate {
            kind: RuleKind::Birthday,
            message: format!(
                "Parabéns, {}! Que seu dia seja lindo e cheio de luz ✨ Quando quiser, estou aqui!",
                client.name
            ),
        });
    }

    out
}

/// Calendar-month arithmetic: due once `last_appointment + 3 months` has
/// passed, so the trigger stays true every day until the date is updated.
fn followup_due(last_appointment: NaiveDate, today: NaiveDate) -> bool {
    last_appointment
        .checked_add_months(Months::new(3))
        .is_some_and(|due| due <= today)
}
