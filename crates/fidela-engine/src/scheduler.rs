//! Scheduler Trigger — generate then dispatch, daily or on demand.
//!
//! Both the recurring timer and the manual "run now" path go through
//! [`run_once_on`]; there is no special-casing between them.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use tokio::task::JoinHandle;

use fidela_core::error::Result;
use fidela_core::traits::Sender;
use fidela_store::Store;

use crate::dispatch::{self, DispatchReport};
use crate::generate;

/// One generate-then-dispatch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub generated: usize,
    pub dispatch: DispatchReport,
}

/// Generate tasks for `today` and immediately dispatch everything due.
/// Newly generated tasks carry `scheduled_for = today`, so they are eligible
/// in the dispatch phase of the same run.
pub async fn run_once_on(
    store: &Store,
    sender: &dyn Sender,
    today: chrono::NaiveDate,
) -> Result<RunSummary> {
    let generated = generate::generate(store, today)?;
    let dispatch = dispatch::dispatch(store, sender, today).await?;
    Ok(RunSummary { generated, dispatch })
}

/// [`run_once_on`] with the local calendar date.
pub async fn run_once(store: &Store, sender: &dyn Sender) -> Result<RunSummary> {
    run_once_on(store, sender, Local::now().date_naive()).await
}

/// Next wall-clock instant at `hour:minute` strictly after `after`.
pub fn next_fire(after: NaiveDateTime, hour: u32, minute: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let today_fire = after.date().and_time(at);
    if today_fire > after {
        today_fire
    } else {
        (after.date() + TimeDelta::days(1)).and_time(at)
    }
}

/// Spawn the daily loop: sleep until the configured local time, run, repeat.
/// Run failures (store I/O) are logged and retried at the next cadence.
pub fn spawn_daily(
    store: Arc<Store>,
    sender: Arc<dyn Sender>,
    hour: u32,
    minute: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("⏰ Scheduler started (daily at {hour:02}:{minute:02})");
        loop {
            let now = Local::now().naive_local();
            let next = next_fire(now, hour, minute);
            let wait = (next - now).num_seconds().max(1) as u64;
            tracing::debug!("next run at {next}");
            tokio::time::sleep(std::time::Duration::from_secs(wait)).await;

            match run_once(&store, sender.as_ref()).await {
                Ok(summary) => tracing::info!(
                    "✅ Daily run: {} generated, {} sent, {} failed",
                    summary.generated,
                    summary.dispatch.sent,
                    summary.dispatch.failed
                ),
                Err(e) => tracing::warn!("daily run failed, will retry tomorrow: {e}"),
            }
        }
    })
}
