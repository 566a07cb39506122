//! The sensor liveness state machine.
//!
//! [`LivenessEngine`] owns the authoritative per-sensor state table. Two
//! paths mutate it:
//!
//! - **Ingestion** ([`LivenessEngine::ingest`]): appends the reading to the
//!   store and promotes the sensor to ONLINE in the same critical section.
//!   This is the only path that ever promotes.
//! - **Sweep** ([`LivenessEngine::sweep_once`]): demotes sensors whose most
//!   recent reading is older than the offline timeout. This is the only
//!   path that ever demotes. The sweep never promotes, so stale data can
//!   never "revive" a sensor.
//!
//! Readers get consistent point-in-time views through
//! [`LivenessEngine::snapshot`], and real status transitions are published
//! on a broadcast channel for the `WebSocket` stream.
//!
//! The whole table sits behind one [`RwLock`]. That serializes concurrent
//! ingestion for the same sensor (required: last completed write wins) at
//! the cost of cross-sensor write parallelism -- an accepted limit at gate
//! cardinality (tens of sensors, not thousands).

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta};
use gatewatch_store::{ReadingStore, StoreError};
use gatewatch_types::{Reading, ReadingId, SensorId, SensorSnapshot, SensorStatus, StatusChange};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::clock::TimeSource;

/// Capacity of the broadcast channel for status changes.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const CHANGE_CAPACITY: usize = 256;

/// Errors that can occur while ingesting a reading.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The reading could not be appended to the store. The sensor state
    /// table is left untouched so the sensor can retry.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Summary of a single sweep pass, for logging.
#[derive(Debug, Clone)]
pub struct SweepSummary {
    /// The instant the pass compared staleness against.
    pub swept_at: DateTime<FixedOffset>,
    /// Sensors whose latest reading was fetched and compared.
    pub evaluated: usize,
    /// Sensors demoted ONLINE -> OFFLINE this pass.
    pub demoted: usize,
    /// Sensors skipped because their latest reading could not be fetched;
    /// they will be re-evaluated next tick.
    pub skipped: usize,
}

/// Mutable state for one sensor, keyed by sensor ID in the engine table.
#[derive(Debug, Clone)]
struct SensorState {
    /// Current derived status.
    status: SensorStatus,
    /// Timestamp of the most recently ingested reading. Always equals
    /// `latest.recorded_at`.
    last_seen: DateTime<FixedOffset>,
    /// The most recently ingested reading (source of batch/total).
    latest: Reading,
}

impl SensorState {
    fn to_snapshot(&self, sensor_id: &SensorId) -> SensorSnapshot {
        SensorSnapshot {
            sensor_id: sensor_id.clone(),
            batch: self.latest.batch,
            total: self.latest.total,
            status: self.status,
            last_seen: self.last_seen,
        }
    }
}

/// The authoritative liveness state machine.
///
/// Constructed once at process start, shared by handle with the HTTP layer
/// and the sweep task, torn down at process stop. Sensor states are created
/// on first reading and never destroyed within the process lifetime.
pub struct LivenessEngine {
    store: Arc<dyn ReadingStore>,
    clock: Arc<dyn TimeSource>,
    offline_timeout: TimeDelta,
    states: RwLock<BTreeMap<SensorId, SensorState>>,
    changes: broadcast::Sender<StatusChange>,
}

impl LivenessEngine {
    /// Create an engine over the given store and clock.
    ///
    /// `offline_timeout` is the silence span after which the sweep demotes
    /// a sensor; exactly-equal silence is still ONLINE.
    pub fn new(
        store: Arc<dyn ReadingStore>,
        clock: Arc<dyn TimeSource>,
        offline_timeout: Duration,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            store,
            clock,
            offline_timeout: TimeDelta::from_std(offline_timeout).unwrap_or(TimeDelta::MAX),
            states: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    /// Ingest one reading: stamp it, append it to the store, and promote
    /// the sensor to ONLINE.
    ///
    /// The append and the state update share the table lock, so for
    /// concurrent ingestion of the same sensor the write whose append
    /// completes last also decides `last_seen` -- completion order wins,
    /// and the state table always agrees with the store's latest entry.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Store`] if the append fails; the state table
    /// is not modified in that case.
    pub async fn ingest(
        &self,
        sensor_id: SensorId,
        batch: i64,
        total: u64,
    ) -> Result<Reading, IngestError> {
        let reading = Reading {
            id: ReadingId::new(),
            sensor_id,
            batch,
            total,
            recorded_at: self.clock.now(),
        };

        let mut states = self.states.write().await;
        self.store.append(reading.clone()).await?;

        match states.entry(reading.sensor_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(SensorState {
                    status: SensorStatus::Online,
                    last_seen: reading.recorded_at,
                    latest: reading.clone(),
                });
                self.notify(StatusChange {
                    sensor_id: reading.sensor_id.clone(),
                    previous: None,
                    current: SensorStatus::Online,
                    at: reading.recorded_at,
                });
            }
            Entry::Occupied(mut slot) => {
                let state = slot.get_mut();
                let previous = state.status;
                state.status = SensorStatus::Online;
                state.last_seen = reading.recorded_at;
                state.latest = reading.clone();
                // ONLINE -> ONLINE is a no-op transition: no notification.
                if previous == SensorStatus::Offline {
                    self.notify(StatusChange {
                        sensor_id: reading.sensor_id.clone(),
                        previous: Some(previous),
                        current: SensorStatus::Online,
                        at: reading.recorded_at,
                    });
                }
            }
        }

        Ok(reading)
    }

    /// Run one sweep pass: demote every sensor whose latest reading is
    /// strictly older than the offline timeout.
    ///
    /// The sensor list is copied up front and each sensor's latest reading
    /// is fetched from the store without holding the table lock, so
    /// ingestion is never blocked behind storage I/O for the whole pass.
    /// A per-sensor store failure is logged and skipped -- the sensor is
    /// re-evaluated on the next tick and the pass continues.
    pub async fn sweep_once(&self) -> SweepSummary {
        let now = self.clock.now();

        let sensor_ids: Vec<SensorId> = {
            let states = self.states.read().await;
            states.keys().cloned().collect()
        };

        let mut evaluated: usize = 0;
        let mut demoted: usize = 0;
        let mut skipped: usize = 0;

        for sensor_id in sensor_ids {
            let latest = match self.store.latest(&sensor_id).await {
                Ok(Some(reading)) => reading,
                // A sensor with no readings at all is never demoted.
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        sensor_id = %sensor_id,
                        error = %error,
                        "sweep: latest reading unavailable, retrying next tick"
                    );
                    skipped = skipped.saturating_add(1);
                    continue;
                }
            };

            evaluated = evaluated.saturating_add(1);

            // Strict inequality: silence of exactly the timeout is ONLINE.
            if now.signed_duration_since(latest.recorded_at) <= self.offline_timeout {
                continue;
            }

            let mut states = self.states.write().await;
            let Some(state) = states.get_mut(&sensor_id) else {
                continue;
            };
            // An ingest may have landed between the store read and this
            // lock; `last_seen` is authoritative.
            if now.signed_duration_since(state.last_seen) <= self.offline_timeout {
                continue;
            }
            // OFFLINE -> OFFLINE is a no-op transition: no notification.
            if state.status == SensorStatus::Offline {
                continue;
            }

            state.status = SensorStatus::Offline;
            demoted = demoted.saturating_add(1);
            self.notify(StatusChange {
                sensor_id: sensor_id.clone(),
                previous: Some(SensorStatus::Online),
                current: SensorStatus::Offline,
                at: now,
            });
        }

        let summary = SweepSummary {
            swept_at: now,
            evaluated,
            demoted,
            skipped,
        };
        debug!(
            evaluated = summary.evaluated,
            demoted = summary.demoted,
            skipped = summary.skipped,
            "sweep pass complete"
        );
        summary
    }

    /// Consistent point-in-time view of every sensor ever seen, ordered by
    /// sensor ID, each exactly once.
    ///
    /// One read-lock acquisition over the whole table; hold time is
    /// proportional to the number of sensors, never to the number of
    /// readings.
    pub async fn snapshot(&self) -> Vec<SensorSnapshot> {
        let states = self.states.read().await;
        states
            .iter()
            .map(|(sensor_id, state)| state.to_snapshot(sensor_id))
            .collect()
    }

    /// Current view of one sensor, or `None` if it has never reported.
    pub async fn sensor(&self, sensor_id: &SensorId) -> Option<SensorSnapshot> {
        let states = self.states.read().await;
        states
            .get(sensor_id)
            .map(|state| state.to_snapshot(sensor_id))
    }

    /// Current status of one sensor, or `None` if it has never reported.
    pub async fn status(&self, sensor_id: &SensorId) -> Option<SensorStatus> {
        let states = self.states.read().await;
        states.get(sensor_id).map(|state| state.status)
    }

    /// Subscribe to status-change notifications.
    ///
    /// Only real transitions are published; no-op transitions (a reading
    /// for an already-ONLINE sensor, a sweep over an already-OFFLINE one)
    /// never appear on the channel.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.changes.subscribe()
    }

    /// Publish a status change to all subscribers.
    fn notify(&self, change: StatusChange) {
        // send returns Err only when there are zero receivers, which is
        // normal when no WebSocket clients are connected.
        let receivers = self.changes.send(change).unwrap_or(0);
        debug!(receivers, "status change published");
    }
}
