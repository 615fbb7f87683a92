//! Periodic expiry of listings whose pickup window has passed.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{listing::board::Board, store::Store};

/// Spawns a task that expires stale listings every `every` until `cancel`
/// is triggered. The first pass runs immediately.
pub fn spawn<St: Store>(
    board: Board<St>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => match board.expire_stale(Utc::now()) {
                    Ok(0) => (),
                    Ok(count) => tracing::info!(count, "expired stale listings"),
                    Err(err) => tracing::error!("failed to expire listings: {err}"),
                },
            }
        }
        tracing::debug!("expiry sweep stopped");
    })
}
