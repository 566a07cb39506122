//! Append-only reading store for the Gatewatch service.
//!
//! The store is a pure log of ingested [`Reading`]s: it never rejects
//! out-of-order or duplicate-looking data, never mutates an entry, and has
//! no deletion operation (counter resets are a dashboard presentation
//! concern and never reach the store).
//!
//! [`ReadingStore`] is the seam the storage collaborator implements. The
//! only implementation in this repository is [`MemoryReadingStore`]; a
//! database-backed one would implement the same trait and map its failures
//! onto [`StoreError`].

pub mod error;
pub mod memory;

use std::collections::BTreeSet;

use async_trait::async_trait;
use gatewatch_types::{Reading, SensorId};

pub use error::StoreError;
pub use memory::MemoryReadingStore;

/// Interface of the append-only reading log.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Append a reading to the log.
    ///
    /// Always succeeds barring a storage failure; the log accepts any
    /// reading as-is.
    async fn append(&self, reading: Reading) -> Result<(), StoreError>;

    /// Return the most recently **appended** reading for a sensor, or
    /// `None` if the sensor has never reported.
    ///
    /// "Latest" is arrival order, not maximum timestamp: a late-arriving
    /// reading with an earlier timestamp still supersedes.
    async fn latest(&self, sensor_id: &SensorId) -> Result<Option<Reading>, StoreError>;

    /// Return every distinct sensor ID that has ever appeared in the log.
    async fn sensor_ids(&self) -> Result<BTreeSet<SensorId>, StoreError>;
}
