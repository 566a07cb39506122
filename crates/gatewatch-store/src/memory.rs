//! In-memory implementation of the reading store.
//!
//! Backs the log with a `Vec` and keeps a per-sensor index of the last
//! appended position, all behind a single [`RwLock`]. Sufficient for the
//! expected gate cardinality (tens of sensors, one reading every few
//! seconds); a production deployment can swap in a database-backed
//! [`ReadingStore`](crate::ReadingStore) without touching the engine.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use gatewatch_types::{Reading, SensorId};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::ReadingStore;

/// Interior of the log: the append-only vector plus the latest-index map.
#[derive(Debug, Default)]
struct LogInner {
    /// Every reading ever appended, in arrival order.
    readings: Vec<Reading>,
    /// Position of the most recently appended reading per sensor.
    latest: BTreeMap<SensorId, usize>,
}

/// Append-only in-memory reading log.
#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    inner: RwLock<LogInner>,
}

impl MemoryReadingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of readings ever appended (across all sensors).
    pub async fn reading_count(&self) -> usize {
        self.inner.read().await.readings.len()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn append(&self, reading: Reading) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let position = inner.readings.len();
        inner.latest.insert(reading.sensor_id.clone(), position);
        inner.readings.push(reading);
        Ok(())
    }

    async fn latest(&self, sensor_id: &SensorId) -> Result<Option<Reading>, StoreError> {
        let inner = self.inner.read().await;
        let reading = inner
            .latest
            .get(sensor_id)
            .and_then(|&position| inner.readings.get(position))
            .cloned();
        Ok(reading)
    }

    async fn sensor_ids(&self) -> Result<BTreeSet<SensorId>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.latest.keys().cloned().collect())
    }
}
