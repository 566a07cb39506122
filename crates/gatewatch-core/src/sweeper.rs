//! The permanent background sweep task.
//!
//! [`spawn_sweeper`] launches a Tokio task that runs
//! [`LivenessEngine::sweep_once`] on a fixed interval for the lifetime of
//! the process. Per-sensor failures are already isolated inside the sweep
//! pass, so the loop body cannot fail and the task never terminates on its
//! own. On process shutdown the task is simply abandoned: no durable
//! invariant depends on a sweep completing, and the next process picks up
//! status correction on its first tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::LivenessEngine;

/// Spawn the sweep loop on a background Tokio task.
///
/// Ticks every `interval` (the configured sweep interval, typically 5-10
/// seconds) and demotes sensors whose latest reading has gone stale. The
/// returned [`JoinHandle`] can be held for lifecycle bookkeeping or
/// dropped; the task keeps running either way.
pub fn spawn_sweeper(engine: Arc<LivenessEngine>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_seconds = interval.as_secs(), "sweep task started");

        loop {
            ticker.tick().await;
            let summary = engine.sweep_once().await;
            if summary.demoted > 0 {
                info!(
                    demoted = summary.demoted,
                    evaluated = summary.evaluated,
                    "sweep demoted stale sensors"
                );
            } else {
                debug!(
                    evaluated = summary.evaluated,
                    skipped = summary.skipped,
                    "sweep found nothing stale"
                );
            }
        }
    })
}
