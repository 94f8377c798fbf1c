//! Broadcast Pipeline — fan one ad-hoc message out to every client, with
//! randomized pacing, independent of the task table.
//!
//! Runs as a managed tokio task so the triggering caller is never blocked
//! for the full broadcast duration; the handle yields a report on await and
//! per-client outcomes land in the message log either way.

use std::sync::Arc;

use chrono::Local;
use rand::Rng;
use tokio::task::JoinHandle;

use fidela_core::traits::Sender;
use fidela_core::types::{LogOutcome, PROMO_KIND};
use fidela_store::Store;

/// Per-client delay bounds, uniform random in `[min_secs, max_secs]`.
/// Exists to keep bulk sends under the channel's throttling radar.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { min_secs: 10, max_secs: 30 }
    }
}

impl Pacing {
    /// No delay — for tests and dry runs.
    pub fn none() -> Self {
        Self { min_secs: 0, max_secs: 0 }
    }

    fn delay_secs(&self) -> u64 {
        if self.max_secs == 0 || self.max_secs < self.min_secs {
            return 0;
        }
        rand::thread_rng().gen_range(self.min_secs..=self.max_secs)
    }
}

/// Totals from one completed broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Handle to a running broadcast worker.
pub struct BroadcastHandle {
    join: JoinHandle<BroadcastReport>,
}

impl BroadcastHandle {
    /// Wait for the broadcast to finish and get its totals.
    pub async fn wait(self) -> BroadcastReport {
        match self.join.await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("broadcast worker panicked or was cancelled: {e}");
                BroadcastReport::default()
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancellation hook — stops the worker between sends; entries already
    /// logged stay logged.
    pub fn abort(&self) {
        self.join.abort();
    }
}

/// Start a broadcast of `message` (optionally with an image reference) to
/// every client. Returns immediately.
pub fn spawn(
    store: Arc<Store>,
    sender: Arc<dyn Sender>,
    message: String,
    image: Option<String>,
    pacing: Pacing,
) -> BroadcastHandle {
    let join = tokio::spawn(run(store, sender, message, image, pacing));
    BroadcastHandle { join }
}

async fn run(
    store: Arc<Store>,
    sender: Arc<dyn Sender>,
    message: String,
    image: Option<String>,
    pacing: Pacing,
) -> BroadcastReport {
    let clients = match store.list_clients() {
        Ok(clients) => clients,
        Err(e) => {
            tracing::warn!("broadcast aborted, cannot list clients: {e}");
            return BroadcastReport::default();
        }
    };

    tracing::info!("📣 Broadcast started: {} client(s)", clients.len());
    let mut report = BroadcastReport::default();

    for client in &clients {
        let delay = pacing.delay_secs();
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
        }

        match sender.send(&client.phone, &message, image.as_deref()).await {
            Ok(()) => {
                let today = Local::now().date_naive();
                // best effort — a store hiccup on one client must not stop
                // the fan-out; the log is the observable surface
                if let Err(e) = store.set_last_contacted(client.id, today) {
                    tracing::warn!(client = client.id, "last_contacted update failed: {e}");
                }
                if let Err(e) = store.append_log(
                    Some(client.id),
                    &client.phone,
                    &message,
                    PROMO_KIND,
                    LogOutcome::Sent,
                    None,
                ) {
                    tracing::warn!(client = client.id, "log append failed: {e}");
                }
                report.sent += 1;
            }
            Err(e) => {
                let reason = e.to_string();
                if let Err(e) = store.append_log(
                    Some(client.id),
                    &client.phone,
                    &message,
                    PROMO_KIND,
                    LogOutcome::Failed,
                    Some(&reason),
                ) {
                    tracing::warn!(client = client.id, "log append failed: {e}");
                }
                report.failed += 1;
                tracing::warn!(client = client.id, "broadcast send failed: {reason}");
            }
        }
    }

    tracing::info!("📣 Broadcast finished: {} sent, {} failed", report.sent, report.failed);
    report
}
