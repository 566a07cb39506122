//! Core value structs: readings, per-sensor snapshots, and status changes.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::SensorStatus;
use crate::ids::{ReadingId, SensorId};

/// One ingested person-count observation from a gate sensor.
///
/// Immutable once created: the reading store is an append-only log and
/// nothing ever mutates or deletes a reading. The timestamp is assigned by
/// the server at ingestion time from the shared wall clock, never taken
/// from the sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Reading {
    /// Server-assigned identifier for this reading.
    pub id: ReadingId,
    /// The sensor that emitted the reading.
    pub sensor_id: SensorId,
    /// Sensor-local batch counter for the reporting cycle.
    pub batch: i64,
    /// Cumulative person count. Monotonically non-decreasing per sensor by
    /// sensor contract; not enforced here.
    pub total: u64,
    /// Server-assigned ingestion instant in the configured timezone.
    pub recorded_at: DateTime<FixedOffset>,
}

/// Point-in-time view of one sensor, as served to the dashboard.
///
/// Field names and JSON shape are the dashboard contract: the status query
/// endpoint returns a bare array of these rows, and the dashboard indexes
/// `sensor_id`, `total`, `status`, and `last_seen` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SensorSnapshot {
    /// The sensor this row describes.
    pub sensor_id: SensorId,
    /// Batch counter from the sensor's latest reading.
    pub batch: i64,
    /// Cumulative total from the sensor's latest reading.
    pub total: u64,
    /// Current derived liveness status.
    pub status: SensorStatus,
    /// Timestamp of the most recently ingested reading (ISO-8601).
    pub last_seen: DateTime<FixedOffset>,
}

/// Notification emitted when a sensor's status actually changes.
///
/// Emitted on first sight (`previous: None`), on promotion back from
/// `OFFLINE`, and on sweep demotion. No-op transitions (a reading arriving
/// for an already-`ONLINE` sensor, a sweep pass over an already-`OFFLINE`
/// one) emit nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatusChange {
    /// The sensor whose status changed.
    pub sensor_id: SensorId,
    /// Status before the transition; `None` for a first-seen sensor.
    pub previous: Option<SensorStatus>,
    /// Status after the transition.
    pub current: SensorStatus,
    /// Instant the transition was decided.
    pub at: DateTime<FixedOffset>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_instant() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-02-04T09:30:00+05:30").unwrap()
    }

    #[test]
    fn snapshot_serializes_dashboard_fields() {
        let row = SensorSnapshot {
            sensor_id: SensorId::from("G1"),
            batch: 3,
            total: 42,
            status: SensorStatus::Online,
            last_seen: sample_instant(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["sensor_id"], "G1");
        assert_eq!(json["total"], 42);
        assert_eq!(json["status"], "ONLINE");
        // last_seen must parse back as an ISO-8601 instant.
        let parsed = DateTime::parse_from_rfc3339(json["last_seen"].as_str().unwrap());
        assert!(parsed.is_ok());
    }

    #[test]
    fn reading_roundtrips_through_json() {
        let reading = Reading {
            id: ReadingId::new(),
            sensor_id: SensorId::from("G2"),
            batch: 1,
            total: 7,
            recorded_at: sample_instant(),
        };
        let json = serde_json::to_string(&reading).unwrap();
        let restored: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, reading);
    }

    #[test]
    fn status_change_first_seen_has_no_previous() {
        let change = StatusChange {
            sensor_id: SensorId::from("G1"),
            previous: None,
            current: SensorStatus::Online,
            at: sample_instant(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert!(json["previous"].is_null());
        assert_eq!(json["current"], "ONLINE");
    }
}
