//! Task Generator — one pass over all clients, gated by the dedup guard.

use chrono::{Duration, NaiveDate};

use fidela_core::error::Result;
use fidela_store::Store;

use crate::rules;

/// Evaluate every client against the rule set and insert a pending task for
/// each candidate the cooldown guard permits. Returns how many were created.
///
/// Idempotent within the cooldown window: the first run's insert satisfies
/// the guard for any rerun the same day (every cooldown is >= 10 days).
pub fn generate(store: &Store, today: NaiveDate) -> Result<usize> {
    let clients = store.list_clients()?;
    let mut created = 0;

    for client in &clients {
        for candidate in rules::evaluate(client, today) {
            let cutoff = today - Duration::days(candidate.kind.cooldown_days());
            if store.has_recent_task(client.id, candidate.kind, cutoff)? {
                continue;
            }
            store.insert_task(client.id, candidate.kind, today, &candidate.message)?;
            created += 1;
            tracing::debug!(
                client = client.id,
                kind = candidate.kind.as_str(),
                "task created"
            );
        }
    }

    if created > 0 {
        tracing::info!("📅 Generator created {created} task(s)");
    }
    Ok(created)
}
